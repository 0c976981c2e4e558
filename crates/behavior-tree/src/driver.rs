//! Periodic root driver.
//!
//! [`TreeDriver`] ticks a root node, sleeps for the configured period and
//! repeats. The root's result is informational only: the driver keeps ticking
//! after `Success` or `Failure` and stops only when cancelled or when its
//! tick budget is spent.

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::behavior::TreeNode;
use crate::config::DriverConfig;
use crate::status::Status;

/// Outcome of a driver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSummary {
    /// Number of root ticks that completed.
    pub ticks: u64,
    /// Result of the last completed root tick (`Idle` if none completed).
    pub last_status: Status,
}

pub struct TreeDriver {
    config: DriverConfig,
}

impl TreeDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Drives `root` until `stop` is cancelled or `max_ticks` is reached.
    ///
    /// A tick in progress when `stop` fires is completed first. A root still
    /// `Running` when the driver stops is halted before returning.
    pub async fn run(&self, root: &dyn TreeNode, stop: &CancellationToken) -> DriverSummary {
        let period = self.config.tick_period;
        info!(
            root = root.name(),
            period_ms = period.as_millis() as u64,
            max_ticks = ?self.config.max_ticks,
            "start ticking"
        );

        let mut ticks = 0u64;
        let mut last_status = Status::Idle;

        while !stop.is_cancelled() {
            // A tick always runs to completion; stop is only honored between ticks.
            debug!(root = root.name(), tick = ticks + 1, "ticking the root node");
            last_status = root.tick().await;
            ticks += 1;
            debug!(root = root.name(), status = %last_status, "root ticked");

            if let Some(max) = self.config.max_ticks
                && ticks >= max
            {
                break;
            }
            if stop.is_cancelled() {
                break;
            }

            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                _ = time::sleep(period) => {}
            }
        }

        if last_status == Status::Running || root.status() == Status::Running {
            root.halt().await;
        }

        info!(root = root.name(), ticks, status = %last_status, "stopped ticking");
        DriverSummary { ticks, last_status }
    }
}
