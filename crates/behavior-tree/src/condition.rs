//! Synchronous leaf nodes.
//!
//! A condition is evaluated inline by its parent and answers immediately
//! with `Success` or `Failure`. It has no running state, so halting it is a
//! no-op.

use async_trait::async_trait;
use tracing::warn;

use crate::behavior::TreeNode;
use crate::node::NodeCore;
use crate::status::{NodeKind, Status};

/// Instantaneous check evaluated on every tick.
///
/// Implementations must not block and must only return `Success` or
/// `Failure`. Any other value is treated as `Failure`.
pub trait Condition: Send + Sync + 'static {
    fn check(&self) -> Status;
}

/// Closure-backed [`Condition`].
pub struct ConditionFn<F> {
    f: F,
}

impl<F> ConditionFn<F>
where
    F: Fn() -> Status + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Condition for ConditionFn<F>
where
    F: Fn() -> Status + Send + Sync + 'static,
{
    fn check(&self) -> Status {
        (self.f)()
    }
}

/// Leaf node wrapping a [`Condition`].
pub struct ConditionNode {
    core: NodeCore,
    condition: Box<dyn Condition>,
}

impl ConditionNode {
    pub fn new(name: impl Into<String>, condition: impl Condition) -> Self {
        Self {
            core: NodeCore::new(name, NodeKind::Condition),
            condition: Box::new(condition),
        }
    }

    /// Creates a condition node from a closure.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Status + Send + Sync + 'static,
    {
        Self::new(name, ConditionFn::new(f))
    }
}

#[async_trait]
impl TreeNode for ConditionNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    async fn tick(&self) -> Status {
        match self.condition.check() {
            status @ (Status::Success | Status::Failure) => status,
            other => {
                warn!(
                    node = self.core.name(),
                    status = %other,
                    "condition returned a non-terminal status, treating as failure"
                );
                Status::Failure
            }
        }
    }

    async fn halt(&self) {}

    fn depth(&self) -> usize {
        0
    }

    fn reset_display_state(&self) {
        self.core.set_display_status(Status::Idle);
    }
}
