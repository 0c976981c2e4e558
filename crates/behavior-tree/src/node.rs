//! Per-node state shared by every node type.
//!
//! [`NodeCore`] carries the node's identity, its execution status, its
//! display status and its [`TickEngine`]. Status and display status live in
//! separate `watch` channels, so each field is synchronized on its own and
//! observers can await transitions instead of polling.

use tokio::sync::watch;

use crate::status::{NodeKind, Status};
use crate::tick_engine::TickEngine;

#[derive(Debug)]
pub struct NodeCore {
    name: String,
    kind: NodeKind,
    status: watch::Sender<Status>,
    display_status: watch::Sender<Status>,
    engine: TickEngine,
}

impl NodeCore {
    /// Only concrete node types build a core, which keeps `kind` consistent
    /// with the node's behavior.
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        let (status, _) = watch::channel(Status::Idle);
        let (display_status, _) = watch::channel(Status::Idle);
        Self {
            name: name.into(),
            kind,
            status,
            display_status,
            engine: TickEngine::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn status(&self) -> Status {
        *self.status.borrow()
    }

    /// Updates the execution status.
    ///
    /// Any value other than `Idle` is mirrored into the display status;
    /// going back to `Idle` leaves the display status untouched.
    pub fn set_status(&self, status: Status) {
        if status != Status::Idle {
            self.set_display_status(status);
        }
        self.status.send_replace(status);
    }

    pub fn display_status(&self) -> Status {
        *self.display_status.borrow()
    }

    pub fn set_display_status(&self, status: Status) {
        self.display_status.send_replace(status);
    }

    /// Returns a receiver that observes every subsequent status change.
    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    pub fn subscribe_display_status(&self) -> watch::Receiver<Status> {
        self.display_status.subscribe()
    }

    pub fn is_halted(&self) -> bool {
        self.status() == Status::Halted
    }

    pub fn engine(&self) -> &TickEngine {
        &self.engine
    }
}
