//! Sample tree: follow a planned path while it is available.
//!
//! ```text
//! Sequence "root"
//!   ├─ Condition "path_available"
//!   └─ Action    "follow_path"
//! ```
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use behavior_tree::config::read_env;
use behavior_tree::{
    ActionContext, ActionFn, ActionNode, ConditionNode, ControlNode, Status, TreeConfig,
};
use tracing::info;

/// Knobs of the sample action.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// Simulated duration of one path-following cycle.
    pub follow_duration: Duration,
    /// Granularity at which the action checks for a halt.
    pub step: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            follow_duration: Duration::from_secs(5),
            step: Duration::from_millis(100),
        }
    }
}

impl DemoConfig {
    /// Environment variables:
    /// - `DEMO_FOLLOW_MS` - Duration of one follow cycle (default: 5000)
    /// - `DEMO_STEP_MS` - Halt polling step (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("DEMO_FOLLOW_MS") {
            config.follow_duration = Duration::from_millis(millis);
        }
        if let Some(millis) = read_env::<u64>("DEMO_STEP_MS") {
            config.step = Duration::from_millis(millis.max(1));
        }

        config
    }
}

/// Waypoints shared between the condition and the action.
#[derive(Clone, Default)]
pub struct Path(Arc<Mutex<Vec<f64>>>);

impl Path {
    fn push(&self, waypoint: f64) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(waypoint);
    }

    fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

pub fn build_tree(config: DemoConfig, tree_config: TreeConfig, path: Path) -> Result<ControlNode> {
    let follow = ActionNode::with_config(
        "follow_path",
        ActionFn::new(move |ctx: ActionContext| follow_path(ctx, path.clone(), config.clone())),
        tree_config,
    )?;

    Ok(ControlNode::sequence("root")
        .with_child(ConditionNode::from_fn("path_available", || Status::Success))
        .with_child(follow))
}

async fn follow_path(ctx: ActionContext, path: Path, config: DemoConfig) -> Status {
    path.push(10.0);
    path.push(20.0);
    info!(node = ctx.name(), waypoints = path.len(), "following path");

    let mut elapsed = Duration::ZERO;
    while elapsed < config.follow_duration {
        if ctx.is_halted() {
            info!(node = ctx.name(), "path following halted");
            return Status::Halted;
        }
        tokio::time::sleep(config.step).await;
        elapsed += config.step;
    }

    info!(node = ctx.name(), "path following succeeded");
    Status::Success
}

#[cfg(test)]
mod tests {
    use behavior_tree::TreeNode;

    use super::*;

    #[tokio::test]
    async fn sample_tree_completes_a_cycle() {
        let config = DemoConfig {
            follow_duration: Duration::from_millis(20),
            step: Duration::from_millis(5),
        };
        let path = Path::default();
        let root = build_tree(config, TreeConfig::default(), path.clone()).expect("runtime");

        assert_eq!(root.tick().await, Status::Running);

        let mut rx = root.children()[1].subscribe_status();
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| *s == Status::Success))
            .await
            .expect("action finishes")
            .expect("sender alive");

        assert_eq!(root.tick().await, Status::Success);
        assert_eq!(path.len(), 2);
        root.shutdown().await.expect("join");
    }
}
