//! Builder utilities for ergonomic behavior tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! trees. Instead of writing `ControlNode::sequence(name).with_child(..)` by
//! hand, you can write `sequence("root", vec![...])`.

use std::future::Future;

use crate::error::Result;
use crate::{ActionContext, ActionNode, ConditionNode, ControlNode, Status, TreeNode};

/// Creates a sequence node with the given children.
#[inline]
pub fn sequence(name: impl Into<String>, children: Vec<Box<dyn TreeNode>>) -> Box<dyn TreeNode> {
    Box::new(control(ControlNode::sequence(name), children))
}

/// Creates a selector node with the given children.
#[inline]
pub fn selector(name: impl Into<String>, children: Vec<Box<dyn TreeNode>>) -> Box<dyn TreeNode> {
    Box::new(control(ControlNode::selector(name), children))
}

/// Creates a condition node from a closure.
///
/// Shorthand for `Box::new(ConditionNode::from_fn(name, f))`.
#[inline]
pub fn condition<F>(name: impl Into<String>, f: F) -> Box<dyn TreeNode>
where
    F: Fn() -> Status + Send + Sync + 'static,
{
    Box::new(ConditionNode::from_fn(name, f))
}

/// Creates an action node from an async closure.
///
/// Must be called inside a tokio runtime; the node's worker is spawned here.
#[inline]
pub fn action<F, Fut>(name: impl Into<String>, f: F) -> Result<Box<dyn TreeNode>>
where
    F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Status> + Send + 'static,
{
    Ok(Box::new(ActionNode::from_fn(name, f)?))
}

fn control(mut node: ControlNode, children: Vec<Box<dyn TreeNode>>) -> ControlNode {
    for child in children {
        node.add_boxed_child(child);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nested_builders_assemble_tree() {
        let tree = selector(
            "root",
            vec![
                sequence(
                    "guarded",
                    vec![
                        condition("blocked", || Status::Failure),
                        condition("unreachable", || Status::Success),
                    ],
                ),
                condition("fallback", || Status::Success),
            ],
        );

        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.tick().await, Status::Success);
    }

    #[tokio::test]
    async fn action_builder_spawns_worker() {
        let node = action("noop", |_ctx| async { Status::Success }).expect("runtime");
        assert_eq!(node.kind(), crate::NodeKind::Action);
        node.shutdown().await.expect("join");
    }
}
