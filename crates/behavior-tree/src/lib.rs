//! Behavior tree tick engine with asynchronous action nodes.
//!
//! A tree is driven by repeatedly ticking its root. Control nodes propagate
//! the tick to their children and fold the results; condition nodes answer
//! inline; action nodes run their work on a dedicated tokio task so that
//! long-running leaves never block the tree walk.
//!
//! - **Non-blocking actions**: parents hand a tick to an action through its
//!   [`TickEngine`] and only wait until the action has picked it up
//! - **Cooperative halting**: halting a branch cancels running actions, which
//!   observe it and return [`Status::Halted`]
//! - **Consumed results**: a parent resets a child to `Idle` as soon as it has
//!   read its `Success` or `Failure`
//!
//! # Architecture
//!
//! - [`TreeNode`]: Core trait for all nodes
//! - [`Status`]: Idle, Running, Success, Failure or Halted
//! - Control node: [`ControlNode`] with a [`ControlPolicy`] (Sequence, Selector)
//! - Leaf nodes: [`ConditionNode`] over a [`Condition`], [`ActionNode`] over an [`Action`]
//! - [`TreeDriver`]: ticks a root at a fixed period

pub mod action;
pub mod behavior;
pub mod builder;
pub mod composite;
pub mod condition;
pub mod config;
pub mod driver;
pub mod error;
pub mod node;
pub mod status;
pub mod tick_engine;

// Re-export core types for ergonomic API
pub use action::{Action, ActionContext, ActionFn, ActionNode};
pub use behavior::TreeNode;
pub use composite::{ControlNode, ControlPolicy};
pub use condition::{Condition, ConditionFn, ConditionNode};
pub use config::{DriverConfig, TreeConfig};
pub use driver::{DriverSummary, TreeDriver};
pub use error::{Result, TreeError};
pub use node::NodeCore;
pub use status::{NodeKind, Status};
pub use tick_engine::TickEngine;
