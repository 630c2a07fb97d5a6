use thiserror::Error;

/// Errors surfaced to callers before any background work begins.
///
/// Sampling-level failures (a custom callback returning an error, a single
/// drive query failing) never reach this enum; they are recorded as absent
/// samples and contained inside the tick.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparklogError {
    /// A requested metric name is neither a builtin tag (`cpu`, `memory`,
    /// `drive`) nor the name of a registered custom callback.
    #[error("unexpected metric {name:?}: expected cpu, memory, drive, or the name of a registered custom metric")]
    UnknownMetric { name: String },
}
