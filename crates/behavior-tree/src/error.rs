//! Infrastructure errors surfaced by the tree.
//!
//! Node outcomes are never errors: a failing child is a [`Status::Failure`].
//! These variants cover runtime wiring only.
//!
//! [`Status::Failure`]: crate::Status::Failure

use thiserror::Error;
use tokio::runtime::TryCurrentError;
use tokio::task::JoinError;

pub type Result<T> = std::result::Result<T, TreeError>;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("action node '{name}' must be created inside a tokio runtime")]
    NoRuntime {
        name: String,
        #[source]
        source: TryCurrentError,
    },

    #[error("tick engine closed")]
    EngineClosed,

    #[error("action node '{name}' worker join failed")]
    WorkerJoin {
        name: String,
        #[source]
        source: JoinError,
    },
}
