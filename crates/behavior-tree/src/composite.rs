//! Composite control nodes.
//!
//! A [`ControlNode`] owns an ordered list of children and folds their
//! results into its own according to a [`ControlPolicy`]:
//! [`Sequence`](ControlPolicy::Sequence) (AND logic) or
//! [`Selector`](ControlPolicy::Selector) (OR logic).
//!
//! # Dispatch
//!
//! Children are visited strictly in order. Action children are signaled
//! through their tick engine and only awaited until they pick the tick up;
//! condition and nested control children are ticked inline. As soon as a
//! child's result differs from the policy's "keep going" status, the later
//! children are halted and that result becomes the node's result. A consumed
//! `Success` or `Failure` always resets the child to `Idle`.

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::action::request_tick;
use crate::behavior::TreeNode;
use crate::error::Result;
use crate::node::NodeCore;
use crate::status::{NodeKind, Status};

/// How a control node combines its children's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlPolicy {
    /// Ticks children left to right while they succeed.
    ///
    /// - If a child returns `Failure`, `Running` or `Halted`, the sequence
    ///   **stops immediately** and reports it
    /// - If all children return `Success`, the sequence returns `Success`
    Sequence,

    /// Ticks children left to right while they fail.
    ///
    /// - If a child returns `Success`, `Running` or `Halted`, the selector
    ///   **stops immediately** and reports it
    /// - If all children return `Failure`, the selector returns `Failure`
    Selector,
}

impl ControlPolicy {
    /// The child result that lets dispatch move on to the next sibling.
    ///
    /// It is also the node's result once every child produced it, including
    /// the degenerate case of a node without children.
    pub fn continue_on(self) -> Status {
        match self {
            ControlPolicy::Sequence => Status::Success,
            ControlPolicy::Selector => Status::Failure,
        }
    }
}

/// Node whose result is derived from its children.
pub struct ControlNode {
    core: NodeCore,
    policy: ControlPolicy,
    children: Vec<Box<dyn TreeNode>>,
}

impl ControlNode {
    pub fn new(name: impl Into<String>, policy: ControlPolicy) -> Self {
        Self {
            core: NodeCore::new(name, NodeKind::Control),
            policy,
            children: Vec::new(),
        }
    }

    /// Creates an empty sequence node.
    pub fn sequence(name: impl Into<String>) -> Self {
        Self::new(name, ControlPolicy::Sequence)
    }

    /// Creates an empty selector node.
    pub fn selector(name: impl Into<String>) -> Self {
        Self::new(name, ControlPolicy::Selector)
    }

    pub fn policy(&self) -> ControlPolicy {
        self.policy
    }

    /// Appends a child. Children are ticked in insertion order.
    pub fn add_child(&mut self, child: impl TreeNode + 'static) {
        self.children.push(Box::new(child));
    }

    /// Appends an already boxed child.
    pub fn add_boxed_child(&mut self, child: Box<dyn TreeNode>) {
        self.children.push(child);
    }

    /// Builder form of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: impl TreeNode + 'static) -> Self {
        self.add_child(child);
        self
    }

    pub fn children(&self) -> &[Box<dyn TreeNode>] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Halts every child from `start` onwards.
    ///
    /// Conditions have nothing to cancel and only get their display state
    /// reset; actions and control nodes are halted if they are `Running`.
    pub async fn halt_children(&self, start: usize) {
        for child in self.children.iter().skip(start) {
            match child.kind() {
                NodeKind::Condition => child.reset_display_state(),
                NodeKind::Action | NodeKind::Control => {
                    if child.status() == Status::Running {
                        debug!(parent = self.core.name(), child = child.name(), "halting child");
                        child.halt().await;
                    } else {
                        trace!(
                            parent = self.core.name(),
                            child = child.name(),
                            status = %child.status(),
                            "child not running, nothing to halt"
                        );
                    }
                }
            }
        }
    }

    async fn tick_child(child: &dyn TreeNode) -> Status {
        match child.kind() {
            NodeKind::Action => request_tick(child).await,
            NodeKind::Condition | NodeKind::Control => {
                let status = child.tick().await;
                child.set_status(status);
                status
            }
        }
    }

    async fn dispatch(&self) -> Status {
        let keep_going = self.policy.continue_on();

        // The child list is re-read on every tick; it may change between ticks.
        if self.children.is_empty() {
            debug!(node = self.core.name(), policy = ?self.policy, "no children to tick");
        }

        for (index, child) in self.children.iter().enumerate() {
            let status = Self::tick_child(child.as_ref()).await;
            trace!(node = self.core.name(), child = child.name(), %status, "child ticked");

            if status.is_completed() {
                child.set_status(Status::Idle);
            }

            if status != keep_going {
                self.halt_children(index + 1).await;
                self.core.set_status(status);
                return status;
            }
        }

        self.core.set_status(keep_going);
        keep_going
    }
}

#[async_trait]
impl TreeNode for ControlNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    async fn tick(&self) -> Status {
        self.dispatch().await
    }

    async fn halt(&self) {
        debug!(node = self.core.name(), "halting");
        self.halt_children(0).await;
        self.core.set_status(Status::Halted);
    }

    fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }

    fn reset_display_state(&self) {
        self.core.set_display_status(Status::Idle);
        for child in &self.children {
            child.reset_display_state();
        }
    }

    async fn shutdown(&self) -> Result<()> {
        for child in &self.children {
            child.shutdown().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::condition::ConditionNode;

    fn counted(name: &str, result: Status, calls: &Arc<AtomicUsize>) -> ConditionNode {
        let calls = Arc::clone(calls);
        ConditionNode::from_fn(name, move || {
            calls.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    #[tokio::test]
    async fn sequence_all_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seq = ControlNode::sequence("seq")
            .with_child(counted("a", Status::Success, &calls))
            .with_child(counted("b", Status::Success, &calls));

        assert_eq!(seq.tick().await, Status::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(seq.children().iter().all(|c| c.status() == Status::Idle));
        assert_eq!(seq.status(), Status::Success);
    }

    #[tokio::test]
    async fn sequence_fails_on_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let skipped = Arc::new(AtomicUsize::new(0));
        let seq = ControlNode::sequence("seq")
            .with_child(counted("a", Status::Success, &calls))
            .with_child(counted("b", Status::Failure, &calls))
            .with_child(counted("c", Status::Success, &skipped));

        assert_eq!(seq.tick().await, Status::Failure);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(skipped.load(Ordering::SeqCst), 0);
        assert_eq!(seq.children()[1].status(), Status::Idle);
    }

    #[tokio::test]
    async fn selector_succeeds_on_first_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let skipped = Arc::new(AtomicUsize::new(0));
        let sel = ControlNode::selector("sel")
            .with_child(counted("a", Status::Failure, &calls))
            .with_child(counted("b", Status::Success, &calls))
            .with_child(counted("c", Status::Failure, &skipped));

        assert_eq!(sel.tick().await, Status::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(skipped.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn selector_fails_when_all_fail() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sel = ControlNode::selector("sel")
            .with_child(counted("a", Status::Failure, &calls))
            .with_child(counted("b", Status::Failure, &calls));

        assert_eq!(sel.tick().await, Status::Failure);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(sel.status(), Status::Failure);
    }

    #[tokio::test]
    async fn empty_nodes_return_policy_default() {
        assert_eq!(ControlNode::sequence("seq").tick().await, Status::Success);
        assert_eq!(ControlNode::selector("sel").tick().await, Status::Failure);
    }

    #[tokio::test]
    async fn children_added_between_ticks_are_seen() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut seq = ControlNode::sequence("seq");
        assert_eq!(seq.tick().await, Status::Success);

        seq.add_child(counted("late", Status::Failure, &calls));
        assert_eq!(seq.tick().await, Status::Failure);
        assert_eq!(seq.child_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn depth_counts_control_levels() {
        let leaf = || ConditionNode::from_fn("leaf", || Status::Success);
        assert_eq!(ControlNode::sequence("empty").depth(), 1);

        let inner = ControlNode::selector("inner").with_child(leaf());
        let outer = ControlNode::sequence("outer")
            .with_child(leaf())
            .with_child(inner);
        assert_eq!(outer.depth(), 2);
    }

    #[tokio::test]
    async fn reset_display_state_walks_subtree() {
        let inner = ControlNode::selector("inner")
            .with_child(ConditionNode::from_fn("x", || Status::Failure));
        let outer = ControlNode::sequence("outer").with_child(inner);

        outer.tick().await;
        assert_eq!(outer.display_status(), Status::Failure);
        assert_eq!(outer.children()[0].display_status(), Status::Failure);

        outer.reset_display_state();
        assert_eq!(outer.display_status(), Status::Idle);
        assert_eq!(outer.children()[0].display_status(), Status::Idle);
    }

    #[tokio::test]
    async fn halt_marks_node_halted() {
        let seq = ControlNode::sequence("seq")
            .with_child(ConditionNode::from_fn("ok", || Status::Success));
        seq.halt().await;
        assert_eq!(seq.status(), Status::Halted);
        assert!(seq.is_halted());
    }
}
