//! Core domain types: samples, metric identities, graph styles, and the
//! validated per-tick request.
//!
//! Metric names are resolved into the [`Metric`] tagged variant exactly once,
//! when a [`MetricRequest`] is constructed; nothing downstream re-branches on
//! raw strings.

use std::sync::Arc;

use clap::ValueEnum;

use crate::error::SparklogError;

/// One measurement. `None` is an explicit "unknown this tick" marker,
/// distinct from a legitimate zero reading.
pub type Sample = Option<i64>;

/// A user-supplied gauge. Returning `Ok(None)` or `Err(_)` records an absent
/// sample for that metric on that tick; neither aborts the tick.
pub type ProbeFn = Arc<dyn Fn() -> anyhow::Result<Option<f64>> + Send + Sync>;

/// Ordered custom metric registrations (name, callback).
pub type CustomMetrics = Vec<(String, ProbeFn)>;

/// Identity of one metric: a builtin tag or an arbitrary custom name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Metric {
    Cpu,
    Memory,
    Drive,
    Custom(String),
}

impl Metric {
    /// The window-store key for this metric.
    pub fn key(&self) -> &str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Memory => "memory",
            Metric::Drive => "drive",
            Metric::Custom(name) => name,
        }
    }

    /// The log-line label. Builtins are padded to a fixed 6-character field
    /// so their columns line up; custom names are printed as-is.
    pub fn label(&self) -> &str {
        match self {
            Metric::Cpu => "CPU   ",
            Metric::Memory => "Memory",
            Metric::Drive => "Drive ",
            Metric::Custom(name) => name,
        }
    }

    fn from_builtin_tag(tag: &str) -> Option<Self> {
        match tag {
            "cpu" => Some(Metric::Cpu),
            "memory" => Some(Metric::Memory),
            "drive" => Some(Metric::Drive),
            _ => None,
        }
    }
}

/// Sparkline rendering style. A small closed set; unknown styles cannot be
/// expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GraphStyle {
    #[default]
    Bar,
    Linear,
    Vertical,
    AsciiArt,
    Pie,
    Faces,
    Jagged,
}

/// Everything one tick needs: which metrics to sample and report, the custom
/// callbacks, and the sparkline style.
///
/// Construction validates every requested name up front, so a request that
/// exists is a request that can run; the lifecycle wrappers rely on this to
/// fail fast before any thread is spawned.
#[derive(Clone)]
pub struct MetricRequest {
    metrics: Vec<Metric>,
    style: GraphStyle,
    custom: CustomMetrics,
}

impl std::fmt::Debug for MetricRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricRequest")
            .field("metrics", &self.metrics)
            .field("style", &self.style)
            .field("custom", &self.custom.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl MetricRequest {
    /// Builds a request from raw metric names.
    ///
    /// Each name must be a builtin tag (`cpu`, `memory`, `drive`) or match a
    /// registered custom callback; anything else is a validation error naming
    /// the offending metric. Custom callbacks not listed in `names` are still
    /// sampled and reported every tick.
    pub fn new<'a, I>(
        names: I,
        style: GraphStyle,
        custom: CustomMetrics,
    ) -> Result<Self, SparklogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut metrics = Vec::new();
        for name in names {
            if let Some(builtin) = Metric::from_builtin_tag(name) {
                metrics.push(builtin);
            } else if custom.iter().any(|(n, _)| n == name) {
                metrics.push(Metric::Custom(name.to_string()));
            } else {
                return Err(SparklogError::UnknownMetric {
                    name: name.to_string(),
                });
            }
        }
        Ok(Self {
            metrics,
            style,
            custom,
        })
    }

    /// Builds a request for builtin metrics only.
    pub fn builtins<'a, I>(names: I, style: GraphStyle) -> Result<Self, SparklogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(names, style, Vec::new())
    }

    pub fn style(&self) -> GraphStyle {
        self.style
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn custom(&self) -> &CustomMetrics {
        &self.custom
    }

    /// Every window-store key this request touches (requested metrics plus
    /// all custom registrations), in sampling order.
    pub(crate) fn all_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.metrics.iter().map(Metric::key).collect();
        for (name, _) in &self.custom {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// Reporting order for one tick: requested metrics first, then custom
    /// registrations not already requested. Each metric appears once.
    /// Metrics that only live in the window store from an earlier,
    /// differently-scoped call are never part of this list.
    pub(crate) fn report_order(&self) -> Vec<Metric> {
        let mut order = self.metrics.clone();
        for (name, _) in &self.custom {
            let metric = Metric::Custom(name.clone());
            if !order.contains(&metric) {
                order.push(metric);
            }
        }
        order
    }
}
