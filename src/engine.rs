//! The sampling / reporting engine.
//!
//! [`MetricsEngine`] owns the three collaborators a tick needs: the shared
//! window store, the system probe, and the log sink. One [`MetricsEngine::tick`]
//! is one sampling+reporting cycle; it is cheap, contains all sampling-level
//! failures, and is safe to call concurrently from any number of threads.

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::probe::{SysinfoProbe, SystemProbe};
use crate::render::sparkline;
use crate::sink::{MetricSink, TracingSink, LOG_TARGET};
use crate::types::{CustomMetrics, GraphStyle, Metric, MetricRequest, Sample};
use crate::window::WindowStore;

static DEFAULT_ENGINE: Lazy<Arc<MetricsEngine>> = Lazy::new(|| {
    Arc::new(MetricsEngine::new(
        WindowStore::global(),
        Box::new(SysinfoProbe::new()),
        Arc::new(TracingSink),
    ))
});

/// Logs one tick of system metrics on the process-wide default engine.
///
/// Stateful entry point for callers that schedule ticks themselves; the
/// lifecycle wrappers in [`crate::monitor`] drive the same engine from a
/// background thread.
pub fn log_system_metrics(request: &MetricRequest) {
    MetricsEngine::global().tick(request);
}

/// Sampler, reporter and tick orchestration over an injected store, probe
/// and sink.
pub struct MetricsEngine {
    store: Arc<WindowStore>,
    probe: Mutex<Box<dyn SystemProbe>>,
    sink: Arc<dyn MetricSink>,
}

impl std::fmt::Debug for MetricsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsEngine").finish_non_exhaustive()
    }
}

impl MetricsEngine {
    pub fn new(
        store: Arc<WindowStore>,
        probe: Box<dyn SystemProbe>,
        sink: Arc<dyn MetricSink>,
    ) -> Self {
        Self {
            store,
            probe: Mutex::new(probe),
            sink,
        }
    }

    /// The process-wide engine: global window store, `sysinfo` probe,
    /// `tracing` sink.
    pub fn global() -> Arc<MetricsEngine> {
        DEFAULT_ENGINE.clone()
    }

    pub fn store(&self) -> &Arc<WindowStore> {
        &self.store
    }

    /// Whether the sink would currently emit anything. Lifecycle wrappers
    /// use this to avoid spawning a scheduler thread nobody can observe.
    pub fn sink_enabled(&self) -> bool {
        self.sink.enabled()
    }

    /// Runs one sampling+reporting cycle.
    ///
    /// Order: short-circuit when logging is disabled, ensure windows exist
    /// for every requested and custom name, sample customs then builtins,
    /// re-trim defensively, then report each metric in the request. Only
    /// metrics named by this request are reported, regardless of what else
    /// lives in the shared store.
    pub fn tick(&self, request: &MetricRequest) {
        if !self.sink.enabled() {
            return;
        }

        self.store.ensure(request.all_names());

        self.sample_customs(request.custom());
        self.sample_builtins(request.metrics());

        self.store.trim_all();

        for metric in request.report_order() {
            if let Some(window) = self.store.snapshot(metric.key()) {
                self.report(&metric, &window, request.style());
            }
        }
    }

    fn sample_customs(&self, custom: &CustomMetrics) {
        for (name, callback) in custom {
            let sample = match callback() {
                Ok(Some(value)) => Some(value as i64),
                Ok(None) => None,
                Err(error) => {
                    tracing::debug!(
                        target: LOG_TARGET,
                        metric = %name,
                        %error,
                        "custom metric callback failed; recording an absent sample"
                    );
                    None
                }
            };
            self.store.append(name, sample);
        }
    }

    fn sample_builtins(&self, metrics: &[Metric]) {
        for metric in metrics {
            match metric {
                Metric::Cpu => {
                    let reading = self.probe.lock().unwrap().cpu_percent();
                    match reading {
                        // An exact zero from a non-blocking read is the
                        // cold-start artifact; skip the append this tick.
                        // Other metrics still record.
                        Some(value) if value == 0.0 => {}
                        Some(value) => self.store.append(metric.key(), Some(value as i64)),
                        None => self.store.append(metric.key(), None),
                    }
                }
                Metric::Memory => {
                    let reading = self.probe.lock().unwrap().memory_percent();
                    self.store.append(metric.key(), reading.map(|v| v as i64));
                }
                Metric::Drive => {
                    let reading = self.probe.lock().unwrap().drive_free_percent();
                    self.store.append(metric.key(), reading.map(|v| v as i64));
                }
                // Custom metrics are sampled through their callbacks.
                Metric::Custom(_) => {}
            }
        }
    }

    /// Emits one log line for a metric, unless its window holds nothing but
    /// absent samples yet (then there is nothing meaningful to report and
    /// the metric is skipped silently).
    fn report(&self, metric: &Metric, window: &[Sample], style: GraphStyle) {
        let values: Vec<i64> = window.iter().flatten().copied().collect();
        if values.is_empty() {
            return;
        }

        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        let mean = mean_rounded(&values);
        let current = pad_current(window.last().copied().flatten());

        let line = format!(
            "{}: {}% | min, mean, max ({}, {}, {}) | {}",
            metric.label(),
            current,
            min,
            mean,
            max,
            sparkline(window, style),
        );
        self.sink.emit(&line);
    }
}

/// Arithmetic mean rounded to the nearest integer, ties away from zero
/// (so a mean of 1.5 reports 2).
fn mean_rounded(values: &[i64]) -> i64 {
    let sum: i64 = values.iter().sum();
    (sum as f64 / values.len() as f64).round() as i64
}

/// The "current" field: most recent sample right-justified to two
/// characters; an absent sample renders as two spaces. Values wider than
/// two characters (custom gauges can exceed 99) are printed in full rather
/// than truncated.
fn pad_current(sample: Sample) -> String {
    match sample {
        Some(value) => format!("{value:>2}"),
        None => "  ".to_string(),
    }
}
