//! Error types for metrics collection and sampling.

use std::path::PathBuf;

/// Failure reading or parsing a /proc source.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {} format: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Missing field '{field}' in {}", .path.display())]
    MissingField { path: PathBuf, field: &'static str },
}

/// Fatal error raised by a sampling run.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("Cannot create output file {}: {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write to output file {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Metrics query failed: {0}")]
    Metrics(#[from] MetricsError),
}
