//! Bounded lifetimes for stream subscriptions.
//!
//! A [`TaskScope`] pairs a cancellation token with the runtime the scope's
//! tasks run on. Every task spawned through the scope is raced against the
//! token, so cancelling the scope (or any ancestor) stops all of them at
//! their next await point.

use std::fmt;
use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

use crate::error::{Result, ScopeError};

#[derive(Clone)]
pub struct TaskScope {
    token: CancellationToken,
    runtime: Handle,
}

impl fmt::Debug for TaskScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScope")
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl TaskScope {
    pub fn new(runtime: Handle) -> Self {
        Self {
            token: CancellationToken::new(),
            runtime,
        }
    }

    /// Scope bound to the runtime the caller is currently running on.
    pub fn current() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| ScopeError::NoRuntime)?;
        Ok(Self::new(runtime))
    }

    /// Child scope that is cancelled together with `self` but can also be
    /// cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn spawn<F>(&self, label: &'static str, future: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(target: "mediasel::scope", task = label, "scope cancelled, task stopped");
                }
                _ = future => {
                    debug!(target: "mediasel::scope", task = label, "task finished");
                }
            }
        })
    }

    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            debug!(target: "mediasel::scope", "cancelling scope");
        }
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Guard that cancels this scope when dropped.
    pub fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}
