//! Core node trait.
//!
//! This module defines [`TreeNode`], the capability every node in a tree
//! exposes: ticking, halting, depth and the display-state reset walk. Status
//! accessors are provided on top of the node's [`NodeCore`].

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::Result;
use crate::node::NodeCore;
use crate::status::{NodeKind, Status};

/// A node of a behavior tree.
///
/// Implemented by [`ControlNode`](crate::ControlNode),
/// [`ConditionNode`](crate::ConditionNode) and
/// [`ActionNode`](crate::ActionNode). User logic plugs in through the
/// [`Condition`](crate::Condition) and [`Action`](crate::Action) traits
/// instead.
#[async_trait]
pub trait TreeNode: Send + Sync {
    /// Shared identity and status storage.
    fn core(&self) -> &NodeCore;

    /// Evaluates the node for the current control cycle.
    ///
    /// # Returns
    ///
    /// - `Status::Success` / `Status::Failure` once the node has completed
    /// - `Status::Running` while an action below it is still working
    /// - `Status::Halted` if a running action was halted
    async fn tick(&self) -> Status;

    /// Requests cooperative cancellation of the node and its running descendants.
    async fn halt(&self);

    /// Height of the subtree rooted here; leaves have depth 0.
    fn depth(&self) -> usize;

    /// Sets the display status of the whole subtree back to `Idle`.
    fn reset_display_state(&self);

    /// Stops and joins any worker owned by the subtree.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn kind(&self) -> NodeKind {
        self.core().kind()
    }

    fn status(&self) -> Status {
        self.core().status()
    }

    fn set_status(&self, status: Status) {
        self.core().set_status(status)
    }

    fn display_status(&self) -> Status {
        self.core().display_status()
    }

    fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.core().subscribe_status()
    }

    fn is_halted(&self) -> bool {
        self.core().is_halted()
    }
}

/// Blanket implementation for boxed nodes.
///
/// This allows `Box<dyn TreeNode>` to be used wherever a node is expected,
/// e.g. as the root handed to the driver.
#[async_trait]
impl TreeNode for Box<dyn TreeNode> {
    #[inline]
    fn core(&self) -> &NodeCore {
        (**self).core()
    }

    async fn tick(&self) -> Status {
        (**self).tick().await
    }

    async fn halt(&self) {
        (**self).halt().await
    }

    #[inline]
    fn depth(&self) -> usize {
        (**self).depth()
    }

    #[inline]
    fn reset_display_state(&self) {
        (**self).reset_display_state()
    }

    async fn shutdown(&self) -> Result<()> {
        (**self).shutdown().await
    }
}
