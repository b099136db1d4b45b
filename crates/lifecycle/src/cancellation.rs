//! Cancellation and deadlines for cluster calls.
//!
//! Responsibilities:
//! - Provide a cloneable cancellation token shared by the binary's signal
//!   handler and every running task.
//! - Provide [`Context`], which races each suspension point (transport call
//!   or poll interval) against cancellation and an optional deadline.
//!
//! Invariants:
//! - Once cancelled, a token remains cancelled forever.
//! - A cancelled or expired context never starts another call.
//! - A detached context keeps the deadline but ignores cancellation; it is
//!   used to run compensating steps after the primary was cancelled.

use std::future::Future;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use esmaint_client::ClientError;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::error::TaskError;

/// Cancellation token usable across async tasks.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel token (idempotent).
    pub fn cancel(&self) {
        let was_cancelled = self.cancelled.swap(true, Ordering::SeqCst);
        if !was_cancelled {
            self.notify.notify_waiters();
        }
    }

    /// True if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Await cancellation.
    ///
    /// Safe against missed notifications by creating `notified()` future first,
    /// then checking atomic state.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Execution context threaded through every task.
#[derive(Clone, Debug, Default)]
pub struct Context {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context cancelled through `token`, without a deadline.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token: Some(token),
            deadline: None,
        }
    }

    /// A context that is never cancelled and never expires.
    pub fn background() -> Self {
        Self::default()
    }

    /// Bound this context to expire `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Bound this context to `deadline`, keeping an earlier existing one.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// A child that ignores cancellation but keeps the deadline.
    pub fn detached(&self) -> Self {
        Self {
            token: None,
            deadline: self.deadline,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail fast if the context is already cancelled or expired.
    pub fn check(&self) -> Result<(), TaskError> {
        if self.token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(TaskError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(TaskError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Run one cluster call, abandoning it on cancellation or deadline.
    pub async fn run<T, F>(&self, call: F) -> Result<T, TaskError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(TaskError::Cancelled),
            _ = self.expired() => Err(TaskError::DeadlineExceeded),
            result = call => result.map_err(TaskError::from),
        }
    }

    /// Sleep for `duration` unless cancelled or expired first.
    pub async fn sleep(&self, duration: Duration) -> Result<(), TaskError> {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(TaskError::Cancelled),
            _ = self.expired() => Err(TaskError::DeadlineExceeded),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    async fn cancelled(&self) {
        match &self.token {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }

    async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
