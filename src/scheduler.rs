//! The background scheduler: a plain OS thread that ticks the engine every
//! interval until cancelled.
//!
//! Cancellation is cooperative, via a [`CancelToken`] checked at the top of
//! each iteration and waited on between ticks, so teardown never has to sit
//! out a full interval.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::engine::MetricsEngine;
use crate::sink::LOG_TARGET;
use crate::types::MetricRequest;

/// A one-shot cancellation signal with an interruptible wait.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: Mutex<bool>,
    condvar: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signal and wakes every waiter. Idempotent.
    pub fn cancel(&self) {
        let mut cancelled = self.cancelled.lock().unwrap();
        *cancelled = true;
        self.condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock().unwrap()
    }

    /// Blocks until the token is cancelled or `timeout` elapses. Returns
    /// whether the token was cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cancelled = self.cancelled.lock().unwrap();
        while !*cancelled {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            let (guard, _) = self.condvar.wait_timeout(cancelled, remaining).unwrap();
            cancelled = guard;
        }
        *cancelled
    }
}

/// Repeatedly ticks `engine` with `request` until `cancel` is set.
///
/// There is no retry or backoff: the tick engine contains its own failures,
/// and anything that still escapes terminates the loop (surfaced by the
/// owning lifecycle wrapper at teardown).
pub fn run_scheduler(
    engine: &MetricsEngine,
    request: &MetricRequest,
    interval: Duration,
    cancel: &CancelToken,
) {
    tracing::debug!(target: LOG_TARGET, ?interval, "metrics scheduler started");
    while !cancel.is_cancelled() {
        engine.tick(request);
        if cancel.wait_timeout(interval) {
            break;
        }
    }
    tracing::debug!(target: LOG_TARGET, "metrics scheduler stopped");
}

/// The running scheduler: its thread plus the cancellation signal. Owned by
/// exactly one lifecycle wrapper; stopping signals the token and joins the
/// thread.
#[derive(Debug)]
pub struct SchedulerHandle {
    cancel: Arc<CancelToken>,
    thread: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Spawns the scheduler loop on a new background thread.
    pub fn spawn(engine: Arc<MetricsEngine>, request: MetricRequest, interval: Duration) -> Self {
        let cancel = Arc::new(CancelToken::new());
        let thread_cancel = cancel.clone();
        let thread = thread::Builder::new()
            .name("sparklog-scheduler".to_string())
            .spawn(move || run_scheduler(&engine, &request, interval, &thread_cancel))
            .expect("failed to spawn metrics scheduler thread");
        Self {
            cancel,
            thread: Some(thread),
        }
    }

    /// Signals cancellation and joins the thread. Idempotent; a second call
    /// is a no-op. `Err` carries the panic payload of a scheduler thread
    /// that died mid-run.
    pub fn stop(&mut self) -> thread::Result<()> {
        self.cancel.cancel();
        match self.thread.take() {
            Some(thread) => thread.join(),
            None => Ok(()),
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if self.stop().is_err() {
            // A panic must not be rethrown from Drop (we may already be
            // unwinding); the explicit stop path surfaces it instead.
            tracing::error!(target: LOG_TARGET, "metrics scheduler thread panicked");
        }
    }
}
