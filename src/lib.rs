//! track-cpu-load library
//!
//! Samples host-wide CPU and memory utilization from the Linux proc
//! filesystem and appends each reading to a CSV file.
//!
//! # Usage
//!
//! ```no_run
//! use track_cpu_load::{ProcMetrics, Sampler};
//!
//! let mut source = ProcMetrics::new()?;
//! let written = Sampler::from_label("host1-", 10).run(&mut source)?;
//! println!("{} samples in host1-load.csv", written);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Each line of the file is `"<cpu>,<memory>"`, both percentages rounded to
//! one decimal. CPU usage is measured since the previous reading.

pub mod cli;
pub mod config;
pub mod error;
pub mod sampler;
pub mod system;

// Re-export main types for convenience
pub use error::{MetricsError, SampleError};
pub use sampler::{output_path_for_label, MetricsSource, ProcMetrics, Sample, Sampler};
