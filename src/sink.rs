//! The logger collaborator.
//!
//! The engine only needs two things from a log sink: a cheap "would anyone
//! see this?" predicate, and a way to emit one line. Production goes through
//! `tracing`; tests inject a recording sink.

use tracing::Level;

/// Target under which all metric lines are emitted.
pub const LOG_TARGET: &str = "sparklog";

/// A leveled line sink.
pub trait MetricSink: Send + Sync {
    /// Whether INFO-equivalent emission is currently enabled. Checked before
    /// any sampling work: when nobody can observe the output, the whole tick
    /// is skipped.
    fn enabled(&self) -> bool;

    /// Emits one formatted metric line at INFO-equivalent level.
    fn emit(&self, line: &str);
}

/// Sink backed by the global `tracing` dispatcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MetricSink for TracingSink {
    fn enabled(&self) -> bool {
        tracing::event_enabled!(target: LOG_TARGET, Level::INFO)
    }

    fn emit(&self, line: &str) {
        tracing::info!(target: LOG_TARGET, "{line}");
    }
}
