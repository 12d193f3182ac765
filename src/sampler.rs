//! The sampling loop.
//!
//! A [`Sampler`] opens the output file, then reads one [`Sample`] per
//! interval from a [`MetricsSource`] and appends it as a CSV line until the
//! deadline passes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{MetricsError, SampleError};
use crate::system::{
    read_memory_info, read_total_cpu_stat, round_percent, CpuUsageTracker, DEFAULT_PROC_ROOT,
};

/// Pause between two samples.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// One (CPU%, memory%) reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

impl Sample {
    /// Formats the sample as one CSV line, newline included.
    pub fn to_csv_line(&self) -> String {
        format!("{:.1},{:.1}\n", self.cpu_percent, self.memory_percent)
    }
}

/// Source of system-wide utilization readings.
pub trait MetricsSource {
    /// CPU busy percentage since the previous call.
    fn cpu_percent(&mut self) -> Result<f64, MetricsError>;

    /// Percentage of memory currently in use.
    fn memory_percent(&mut self) -> Result<f64, MetricsError>;

    fn sample(&mut self) -> Result<Sample, MetricsError> {
        Ok(Sample {
            cpu_percent: self.cpu_percent()?,
            memory_percent: self.memory_percent()?,
        })
    }
}

/// Reads utilization from a proc filesystem.
#[derive(Debug)]
pub struct ProcMetrics {
    proc_root: PathBuf,
    cpu: CpuUsageTracker,
}

impl ProcMetrics {
    /// Creates a source over `/proc` and records the CPU baseline.
    pub fn new() -> Result<Self, MetricsError> {
        Self::with_root(DEFAULT_PROC_ROOT)
    }

    /// Creates a source over an arbitrary proc root and records the CPU baseline.
    pub fn with_root(proc_root: impl Into<PathBuf>) -> Result<Self, MetricsError> {
        let proc_root = proc_root.into();
        let mut cpu = CpuUsageTracker::new();
        cpu.update(read_total_cpu_stat(&proc_root)?);
        Ok(Self { proc_root, cpu })
    }
}

impl MetricsSource for ProcMetrics {
    fn cpu_percent(&mut self) -> Result<f64, MetricsError> {
        let stat = read_total_cpu_stat(&self.proc_root)?;
        Ok(round_percent(self.cpu.update(stat)))
    }

    fn memory_percent(&mut self) -> Result<f64, MetricsError> {
        let info = read_memory_info(&self.proc_root)?;
        Ok(round_percent(info.used_percent()))
    }
}

/// Builds the output filename for a label: `"<label>load.csv"`.
pub fn output_path_for_label(label: &str) -> PathBuf {
    PathBuf::from(format!("{label}load.csv"))
}

/// Writes samples to a CSV file until a deadline passes.
#[derive(Debug, Clone)]
pub struct Sampler {
    output: PathBuf,
    duration: Duration,
    interval: Duration,
}

impl Sampler {
    pub fn new(output: impl Into<PathBuf>, duration: Duration) -> Self {
        Self {
            output: output.into(),
            duration,
            interval: SAMPLE_INTERVAL,
        }
    }

    /// Builds a sampler from the CLI values. Non-positive durations take no samples.
    pub fn from_label(label: &str, duration_seconds: i64) -> Self {
        let seconds = u64::try_from(duration_seconds).unwrap_or(0);
        Self::new(output_path_for_label(label), Duration::from_secs(seconds))
    }

    /// Replaces the fixed pause between samples.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Runs the loop and returns the number of samples written.
    ///
    /// The output file is truncated before the first sample. Any error stops
    /// the run; lines flushed so far stay on disk.
    pub fn run<S: MetricsSource>(&self, source: &mut S) -> Result<usize, SampleError> {
        // None when the duration is too large to represent: sample until killed
        let deadline = Instant::now().checked_add(self.duration);

        let file = File::create(&self.output).map_err(|source| SampleError::CreateOutput {
            path: self.output.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        info!(
            "Sampling to {} for {:?} every {:?}",
            self.output.display(),
            self.duration,
            self.interval
        );

        let mut written = 0usize;
        while deadline.map_or(true, |d| Instant::now() < d) {
            let sample = source.sample()?;
            debug!(
                "Sample {}: cpu={}% mem={}%",
                written + 1,
                sample.cpu_percent,
                sample.memory_percent
            );

            writer
                .write_all(sample.to_csv_line().as_bytes())
                .and_then(|_| writer.flush())
                .map_err(|source| SampleError::WriteOutput {
                    path: self.output.clone(),
                    source,
                })?;
            written += 1;

            thread::sleep(self.interval);
        }

        info!("Sampling finished: {} samples written", written);
        Ok(written)
    }
}
