//! Counting signal/wait primitive used to hand ticks to action workers.
//!
//! Every node owns a [`TickEngine`]. A control node calls [`TickEngine::signal`]
//! to request one execution cycle; the action's worker consumes it with
//! [`TickEngine::wait`].
//!
//! Signals accumulate: two `signal()` calls before a `wait()` leave two units
//! pending, so the worker starts a second cycle right after the first one
//! without a fresh request in between.

use tokio::sync::{Semaphore, TryAcquireError};

use crate::error::{Result, TreeError};

/// Semaphore-style tick counter, starting at zero.
#[derive(Debug)]
pub struct TickEngine {
    units: Semaphore,
}

impl TickEngine {
    pub fn new() -> Self {
        Self {
            units: Semaphore::new(0),
        }
    }

    /// Adds one pending tick and wakes a waiter, if any.
    pub fn signal(&self) {
        self.units.add_permits(1);
    }

    /// Consumes one pending tick, suspending until one is available.
    ///
    /// A waiter only returns after it owns a unit; wakeups without a unit are
    /// absorbed by the semaphore. Fails once the engine is closed.
    pub async fn wait(&self) -> Result<()> {
        let permit = self
            .units
            .acquire()
            .await
            .map_err(|_| TreeError::EngineClosed)?;
        permit.forget();
        Ok(())
    }

    /// Consumes one pending tick without suspending.
    ///
    /// Returns `false` when nothing is pending or the engine is closed.
    pub fn try_wait(&self) -> bool {
        match self.units.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(TryAcquireError::NoPermits | TryAcquireError::Closed) => false,
        }
    }

    /// Number of signals not yet consumed.
    pub fn pending(&self) -> usize {
        self.units.available_permits()
    }

    /// Closes the engine, releasing every current and future waiter with
    /// [`TreeError::EngineClosed`].
    pub fn close(&self) {
        self.units.close();
    }

    pub fn is_closed(&self) -> bool {
        self.units.is_closed()
    }
}

impl Default for TickEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn buffered_signals_are_consumed_without_blocking() {
        let engine = TickEngine::new();
        for _ in 0..3 {
            engine.signal();
        }
        assert_eq!(engine.pending(), 3);

        for _ in 0..3 {
            tokio::time::timeout(Duration::from_millis(50), engine.wait())
                .await
                .expect("buffered wait must not block")
                .expect("engine open");
        }
        assert_eq!(engine.pending(), 0);
        assert!(!engine.try_wait());
    }

    #[tokio::test]
    async fn wait_blocks_until_signal() {
        let engine = Arc::new(TickEngine::new());
        let waiter = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!waiter.is_finished());

        engine.signal();
        let result = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter wakes after signal")
            .expect("waiter task");
        assert!(result.is_ok());
        assert_eq!(engine.pending(), 0);
    }

    #[tokio::test]
    async fn one_signal_releases_one_waiter() {
        let engine = Arc::new(TickEngine::new());
        let first = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.wait().await })
        };
        let second = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        engine.signal();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let finished = [first.is_finished(), second.is_finished()];
        assert_eq!(finished.iter().filter(|done| **done).count(), 1);

        engine.signal();
        first.await.expect("first").expect("open");
        second.await.expect("second").expect("open");
    }

    #[tokio::test]
    async fn close_releases_waiters_with_error() {
        let engine = Arc::new(TickEngine::new());
        let waiter = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        engine.close();
        let result = waiter.await.expect("waiter task");
        assert!(matches!(result, Err(TreeError::EngineClosed)));
        assert!(engine.is_closed());
    }
}
