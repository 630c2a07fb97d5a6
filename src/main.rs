//! Sparklog demo binary: samples the requested metrics for a while and logs
//! one sparkline-annotated line per metric per tick.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use sparklog::cli::Cli;
use sparklog::{MetricRequest, MetricsMonitor};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    // Validation happens here, before any background work: a bad metric name
    // exits immediately with a message naming it.
    let names: Vec<&str> = cli.metrics.iter().map(String::as_str).collect();
    let request = MetricRequest::builtins(names, cli.style)?;

    let monitor = MetricsMonitor::start(request, Duration::from_secs(cli.interval));
    thread::sleep(Duration::from_secs(cli.duration));
    monitor.stop();

    Ok(())
}
