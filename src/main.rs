//! track-cpu-load - version 0.1.0
//!
//! Records host CPU and memory utilization to a CSV file with tracing logging.
//! This is the main entry point that resolves configuration and runs the sampler.

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::{debug, info, Level};

use track_cpu_load::cli::Args;
use track_cpu_load::config::{resolve_config, show_config, validate_effective_config, Config};
use track_cpu_load::{ProcMetrics, Sampler};

/// Initializes tracing logging subsystem with configured log level.
///
/// Output goes to stderr; stdout carries only the startup lines.
fn setup_logging(config: &Config) {
    let log_level = match config.log_level().to_ascii_lowercase().as_str() {
        "off" => None,
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => Some(Level::WARN),
    };

    let Some(log_level) = log_level else {
        return;
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
        return;
    }

    debug!("Logging initialized with level: {}", config.log_level());
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = resolve_config(&args).map_err(|e| anyhow!("Failed to load configuration: {e}"))?;
    validate_effective_config(&config).map_err(|e| anyhow!("Configuration invalid: {e}"))?;

    if args.show_config {
        return show_config(&config, args.config_format)
            .map_err(|e| anyhow!("Failed to render configuration: {e}"));
    }

    setup_logging(&config);

    let sampler = Sampler::from_label(config.label(), config.time());

    println!("Writing to \"{}\"", sampler.output().display());
    println!("Will run {} seconds", config.time());

    let mut source = ProcMetrics::new().context("Failed to read initial CPU statistics")?;
    let written = sampler
        .run(&mut source)
        .with_context(|| format!("Sampling to {} failed", sampler.output().display()))?;

    info!("Done: {} samples written", written);
    Ok(())
}
