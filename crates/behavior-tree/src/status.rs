//! Status reported by tree nodes and the node kind tag.

use std::fmt;

/// The state of a node after (or while) it is ticked.
///
/// # Lifecycle
///
/// In steady state a node is observed as `Idle`, `Running` or, briefly,
/// `Halted`. `Success` and `Failure` are transient: the parent consumes them
/// and immediately resets the child back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// The node has not been ticked yet, or its last result was consumed.
    #[default]
    Idle,

    /// The node has made progress but has not completed.
    ///
    /// Only action nodes (and control nodes above them) report this.
    Running,

    /// The node completed successfully.
    ///
    /// For conditions: the condition held.
    /// For actions: the work finished.
    Success,

    /// The node determined it cannot complete.
    Failure,

    /// The node was halted by its parent before completing.
    Halted,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` for `Success` and `Failure`, the results a parent consumes.
    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }

    /// Returns `true` if the node may be (re)started by a fresh tick.
    #[inline]
    pub fn is_ready(self) -> bool {
        matches!(self, Status::Idle | Status::Halted)
    }

    /// Returns `true` once a signaled action has picked up its tick.
    #[inline]
    pub(crate) fn is_acknowledged(self) -> bool {
        matches!(self, Status::Running | Status::Success | Status::Failure)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Idle => "idle",
            Status::Running => "running",
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Halted => "halted",
        };
        write!(f, "{}", label)
    }
}

/// Which family a node belongs to.
///
/// Control nodes dispatch on this tag: actions are signaled through their
/// tick engine, everything else is ticked inline. Each concrete node type
/// fixes its own tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Action,
    Condition,
    Control,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::Action => "action",
            NodeKind::Condition => "condition",
            NodeKind::Control => "control",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(Status::default(), Status::Idle);
    }

    #[test]
    fn completed_statuses() {
        assert!(Status::Success.is_completed());
        assert!(Status::Failure.is_completed());
        assert!(!Status::Running.is_completed());
        assert!(!Status::Halted.is_completed());
        assert!(!Status::Idle.is_completed());
    }

    #[test]
    fn ready_statuses() {
        assert!(Status::Idle.is_ready());
        assert!(Status::Halted.is_ready());
        assert!(!Status::Running.is_ready());
        assert!(!Status::Success.is_ready());
    }

    #[test]
    fn display_labels() {
        assert_eq!(Status::Halted.to_string(), "halted");
        assert_eq!(NodeKind::Control.to_string(), "control");
    }
}
