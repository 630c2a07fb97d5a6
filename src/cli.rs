//! Command-line argument parsing for the demo binary.

use clap::Parser;

use crate::types::GraphStyle;

/// Log sparkline graphs of CPU, memory and drive usage for a while.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Metrics to sample and log (cpu, memory, drive).
    #[arg(long, value_delimiter = ',', default_values_t = ["cpu".to_string(), "memory".to_string()])]
    pub metrics: Vec<String>,

    /// Seconds between samples.
    #[arg(long, value_name = "SECONDS", default_value_t = 1)]
    pub interval: u64,

    /// Sparkline style.
    #[arg(long, value_enum, default_value = "bar")]
    pub style: GraphStyle,

    /// How long the demo runs before exiting, in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 20)]
    pub duration: u64,

    /// Log filter when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
