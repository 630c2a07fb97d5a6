//! Sparklog - sparkline metric logging for long-running processes
//!
//! This library periodically samples process/host metrics (CPU load, memory
//! usage, free drive space, plus arbitrary user-supplied gauges), keeps a
//! short rolling history per metric, and emits one human-readable log line
//! per metric per sampling tick, annotated with an inline sparkline and
//! min/mean/max statistics. It needs no metrics backend: the output is your
//! ordinary log stream.
//!
//! The two front-ends share one engine: wrap a scope with
//! [`MetricsMonitor`], or wrap a single call with [`with_metrics`] /
//! [`with_metrics_async`]. Both start a background scheduler thread on entry
//! and signal + join it on every exit path.

pub mod cli;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod probe;
pub mod render;
pub mod scheduler;
pub mod sink;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
pub mod window;

// Re-export the public surface for convenience.
pub use engine::{log_system_metrics, MetricsEngine};
pub use error::SparklogError;
pub use monitor::{with_metrics, with_metrics_async, MetricsMonitor};
pub use types::{GraphStyle, Metric, MetricRequest, Sample};
pub use window::WindowStore;
