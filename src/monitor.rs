//! Lifecycle wrappers: a scoped monitor and call-wrapping helpers, all thin
//! adapters over one scheduler bracket (start on entry, signal + join on
//! exit).
//!
//! When the sink is disabled no thread is created at all; the wrapped work
//! runs directly with nothing but the one enabled-check of overhead.

use std::future::Future;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::MetricsEngine;
use crate::scheduler::SchedulerHandle;
use crate::types::MetricRequest;

/// A running metrics scope.
///
/// Owns at most one scheduler thread, started when the scope begins and
/// joined when it ends - on every exit path. Dropping the monitor (including
/// during a panic unwind) signals cancellation and joins the thread; a
/// scheduler failure discovered that way is logged, not rethrown. Call
/// [`MetricsMonitor::stop`] on the success path to have such a failure
/// surface instead.
#[derive(Debug)]
pub struct MetricsMonitor {
    scheduler: Option<SchedulerHandle>,
}

impl MetricsMonitor {
    /// Starts a metrics scope on the process-wide default engine.
    ///
    /// `request` is already validated by construction, so this cannot fail;
    /// misconfigured metric names were rejected before any thread could
    /// start. If INFO logging is disabled the monitor stays empty and no
    /// thread is spawned.
    pub fn start(request: MetricRequest, interval: Duration) -> Self {
        Self::start_on(MetricsEngine::global(), request, interval)
    }

    /// Starts a metrics scope on a specific engine.
    pub fn start_on(engine: Arc<MetricsEngine>, request: MetricRequest, interval: Duration) -> Self {
        if !engine.sink_enabled() {
            return Self { scheduler: None };
        }
        Self {
            scheduler: Some(SchedulerHandle::spawn(engine, request, interval)),
        }
    }

    /// Ends the scope: signals cancellation and joins the scheduler thread
    /// before returning. If the scheduler thread panicked mid-run, the panic
    /// is resumed here.
    pub fn stop(mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            if let Err(payload) = scheduler.stop() {
                panic::resume_unwind(payload);
            }
        }
    }
}

/// Runs `call` inside a metrics scope on the default engine. The call's own
/// return value (or panic) propagates unchanged.
pub fn with_metrics<T>(
    request: MetricRequest,
    interval: Duration,
    call: impl FnOnce() -> T,
) -> T {
    with_metrics_on(MetricsEngine::global(), request, interval, call)
}

/// [`with_metrics`] against a specific engine.
pub fn with_metrics_on<T>(
    engine: Arc<MetricsEngine>,
    request: MetricRequest,
    interval: Duration,
    call: impl FnOnce() -> T,
) -> T {
    let monitor = MetricsMonitor::start_on(engine, request, interval);
    // If the call panics, the monitor's Drop still joins the thread; the
    // call's panic takes propagation precedence over a scheduler failure.
    let result = call();
    monitor.stop();
    result
}

/// Awaits `future` inside a metrics scope on the default engine. The
/// scheduler remains an ordinary OS thread; only the wrapped work is
/// suspendable.
pub async fn with_metrics_async<T, F>(request: MetricRequest, interval: Duration, future: F) -> T
where
    F: Future<Output = T>,
{
    with_metrics_async_on(MetricsEngine::global(), request, interval, future).await
}

/// [`with_metrics_async`] against a specific engine.
pub async fn with_metrics_async_on<T, F>(
    engine: Arc<MetricsEngine>,
    request: MetricRequest,
    interval: Duration,
    future: F,
) -> T
where
    F: Future<Output = T>,
{
    let monitor = MetricsMonitor::start_on(engine, request, interval);
    let result = future.await;
    monitor.stop();
    result
}
