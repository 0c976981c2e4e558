//! Asynchronous leaf nodes.
//!
//! An [`ActionNode`] owns a worker task spawned on the tokio runtime when the
//! node is built. The worker sleeps on the node's [`TickEngine`], and each
//! consumed signal runs one cycle of the user [`Action`]:
//!
//! ```text
//! loop {
//!   ├─► engine.wait()            (or exit on shutdown)
//!   ├─► open cycle               (fresh cancellation token, busy = true)
//!   ├─► status = Running
//!   ├─► status = action.run(ctx)
//!   └─► close cycle              (busy = false)
//! }
//! ```
//!
//! Parents never await the body. They signal the engine and wait only until
//! the worker has picked the tick up (see [`request_tick`]).
//!
//! Halting is cooperative: [`ActionNode::halt`] marks the node `Halted` and
//! cancels the cycle token, and the body is expected to notice through
//! [`ActionContext::is_halted`] or [`ActionContext::halted`] and return
//! `Status::Halted`.
//!
//! [`TickEngine`]: crate::TickEngine

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::behavior::TreeNode;
use crate::config::TreeConfig;
use crate::error::{Result, TreeError};
use crate::node::NodeCore;
use crate::status::{NodeKind, Status};

/// Long-running work executed by an [`ActionNode`].
///
/// # Example
///
/// ```rust,ignore
/// struct MoveTo;
///
/// #[async_trait]
/// impl Action for MoveTo {
///     async fn run(&self, ctx: ActionContext) -> Status {
///         for _ in 0..50 {
///             if ctx.is_halted() {
///                 return Status::Halted;
///             }
///             step().await;
///         }
///         Status::Success
///     }
/// }
/// ```
#[async_trait]
pub trait Action: Send + Sync + 'static {
    /// Runs one execution cycle.
    ///
    /// Must return `Success`, `Failure`, or `Halted` (the latter as soon as
    /// `ctx.is_halted()` turns true).
    async fn run(&self, ctx: ActionContext) -> Status;
}

/// Closure-backed [`Action`].
///
/// The closure creates a fresh future per cycle.
pub struct ActionFn<F> {
    f: F,
}

impl<F> ActionFn<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Action for ActionFn<F>
where
    F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Status> + Send + 'static,
{
    async fn run(&self, ctx: ActionContext) -> Status {
        (self.f)(ctx).await
    }
}

/// Handle given to an [`Action`] for the duration of one cycle.
#[derive(Clone)]
pub struct ActionContext {
    shared: Arc<ActionShared>,
    cycle: CancellationToken,
}

impl ActionContext {
    pub fn name(&self) -> &str {
        self.shared.core.name()
    }

    /// Returns `true` once the parent has halted this node.
    pub fn is_halted(&self) -> bool {
        self.shared.core.is_halted() || self.cycle.is_cancelled()
    }

    /// Completes when this cycle is halted or the node shuts down.
    pub async fn halted(&self) {
        self.cycle.cancelled().await
    }

    /// Cancellation token of the current cycle, for handing to nested tasks.
    pub fn token(&self) -> &CancellationToken {
        &self.cycle
    }
}

/// State shared between the node and its worker task.
struct ActionShared {
    core: NodeCore,
    cycle: Mutex<CancellationToken>,
    busy: watch::Sender<bool>,
}

impl ActionShared {
    fn new(name: String) -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            core: NodeCore::new(name, NodeKind::Action),
            cycle: Mutex::new(CancellationToken::new()),
            busy,
        }
    }

    fn lock_cycle(&self) -> MutexGuard<'_, CancellationToken> {
        self.cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_cycle(self: &Arc<Self>, stop: &CancellationToken) -> ActionContext {
        let token = stop.child_token();
        *self.lock_cycle() = token.clone();
        self.busy.send_replace(true);
        ActionContext {
            shared: Arc::clone(self),
            cycle: token,
        }
    }

    fn end_cycle(&self) {
        self.busy.send_replace(false);
    }

    fn cancel_cycle(&self) {
        self.lock_cycle().cancel();
    }
}

/// Background task consuming ticks for one action node.
struct ActionWorker {
    shared: Arc<ActionShared>,
    action: Box<dyn Action>,
    stop: CancellationToken,
}

impl ActionWorker {
    async fn run(self) {
        let name = self.shared.core.name().to_owned();

        loop {
            tokio::select! {
                biased;
                _ = self.stop.cancelled() => break,
                res = self.shared.core.engine().wait() => {
                    if res.is_err() {
                        break;
                    }
                }
            }

            let ctx = self.shared.begin_cycle(&self.stop);
            self.shared.core.set_status(Status::Running);
            debug!(node = %name, "action cycle started");

            let status = tokio::select! {
                biased;
                _ = self.stop.cancelled() => {
                    self.shared.core.set_status(Status::Halted);
                    self.shared.end_cycle();
                    break;
                }
                status = self.action.run(ctx) => status,
            };

            if !matches!(status, Status::Success | Status::Failure | Status::Halted) {
                warn!(node = %name, %status, "action returned an unexpected status");
            }
            self.shared.core.set_status(status);
            self.shared.end_cycle();
            debug!(node = %name, %status, "action cycle finished");
        }

        debug!(node = %name, "action worker stopped");
    }
}

/// Leaf node running an [`Action`] on its own task.
pub struct ActionNode {
    shared: Arc<ActionShared>,
    config: TreeConfig,
    stop: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ActionNode {
    /// Builds the node and spawns its worker on the current tokio runtime.
    ///
    /// Fails with [`TreeError::NoRuntime`] outside a runtime.
    pub fn new(name: impl Into<String>, action: impl Action) -> Result<Self> {
        Self::with_config(name, action, TreeConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        action: impl Action,
        config: TreeConfig,
    ) -> Result<Self> {
        let name = name.into();
        let handle = Handle::try_current().map_err(|source| TreeError::NoRuntime {
            name: name.clone(),
            source,
        })?;

        let shared = Arc::new(ActionShared::new(name));
        let stop = CancellationToken::new();
        let worker = ActionWorker {
            shared: Arc::clone(&shared),
            action: Box::new(action),
            stop: stop.clone(),
        };
        let worker = handle.spawn(worker.run());

        Ok(Self {
            shared,
            config,
            stop,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Creates an action node from an async closure.
    pub fn from_fn<F, Fut>(name: impl Into<String>, f: F) -> Result<Self>
    where
        F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Status> + Send + 'static,
    {
        Self::new(name, ActionFn::new(f))
    }

    /// Returns `true` while a cycle of the action body is executing.
    pub fn is_busy(&self) -> bool {
        *self.shared.busy.borrow()
    }
}

#[async_trait]
impl TreeNode for ActionNode {
    fn core(&self) -> &NodeCore {
        &self.shared.core
    }

    async fn tick(&self) -> Status {
        request_tick(self).await
    }

    async fn halt(&self) {
        let mut busy = self.shared.busy.subscribe();
        self.shared.core.set_status(Status::Halted);
        self.shared.cancel_cycle();
        debug!(node = self.shared.core.name(), "halt requested");

        if let Some(limit) = self.config.halt_ack_timeout {
            let acknowledged = tokio::time::timeout(limit, busy.wait_for(|busy| !*busy))
                .await
                .is_ok();
            if !acknowledged {
                warn!(
                    node = self.shared.core.name(),
                    timeout = ?limit,
                    "action did not acknowledge halt in time"
                );
            }
        }
    }

    fn depth(&self) -> usize {
        0
    }

    fn reset_display_state(&self) {
        self.shared.core.set_display_status(Status::Idle);
    }

    async fn shutdown(&self) -> Result<()> {
        self.stop.cancel();
        self.shared.core.engine().close();

        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            worker.await.map_err(|source| TreeError::WorkerJoin {
                name: self.shared.core.name().to_owned(),
                source,
            })?;
        }
        Ok(())
    }
}

impl Drop for ActionNode {
    fn drop(&mut self) {
        self.stop.cancel();
        self.shared.core.engine().close();
        let worker = self
            .worker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            worker.abort();
        }
    }
}

/// Hands one tick to an action node without running its body inline.
///
/// If the node is `Idle` or `Halted`, its engine is signaled and the caller
/// waits until the worker reports `Running`, `Success` or `Failure`. Any other
/// status is returned as read. There is no timeout: an action that never
/// leaves `Idle` stalls this branch.
pub(crate) async fn request_tick(node: &dyn TreeNode) -> Status {
    let current = node.status();
    if !current.is_ready() {
        return current;
    }

    let mut updates = node.subscribe_status();
    node.core().engine().signal();
    trace!(node = node.name(), "tick signaled");

    match updates.wait_for(|status| status.is_acknowledged()).await {
        Ok(status) => *status,
        Err(_) => node.status(),
    }
}
