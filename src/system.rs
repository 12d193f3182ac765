//! System-wide metrics collection from /proc filesystem.
//!
//! This module reads the aggregate CPU counters from `/proc/stat` and the
//! memory totals from `/proc/meminfo`, and turns them into utilization
//! percentages.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MetricsError;

/// Default mount point of the proc filesystem.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// CPU statistics for calculating usage ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuStat {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuStat {
    /// Calculate total CPU time (all fields).
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    /// Calculate non-active time (idle + iowait).
    /// This includes both true idle time and time spent waiting for I/O operations.
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }
}

/// Memory totals from /proc/meminfo, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl MemoryInfo {
    /// Percentage of memory not available to new allocations.
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        let used = self.total_bytes.saturating_sub(self.available_bytes);
        used as f64 / self.total_bytes as f64 * 100.0
    }
}

/// Parses one `cpu*` line of /proc/stat.
///
/// Format: "cpu  4705 356 584 3699 23 23 0 0 0 0"
/// Returns `None` for lines with fewer than seven counters or non-numeric fields.
pub fn parse_cpu_stat_line(line: &str) -> Option<CpuStat> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 8 || !parts[0].starts_with("cpu") {
        return None;
    }

    let field = |idx: usize| parts[idx].parse::<u64>().ok();

    let steal = if parts.len() > 8 { field(8)? } else { 0 };

    Some(CpuStat {
        user: field(1)?,
        nice: field(2)?,
        system: field(3)?,
        idle: field(4)?,
        iowait: field(5)?,
        irq: field(6)?,
        softirq: field(7)?,
        steal,
    })
}

/// Reads the aggregate `cpu` line (sum over all cores) from `<proc_root>/stat`.
pub fn read_total_cpu_stat(proc_root: &Path) -> Result<CpuStat, MetricsError> {
    let path = proc_root.join("stat");
    let content = read_proc_file(&path)?;

    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| MetricsError::MissingField {
            path: path.clone(),
            field: "cpu",
        })?;

    parse_cpu_stat_line(line).ok_or_else(|| MetricsError::Parse {
        path,
        reason: format!("unparseable cpu line '{}'", line.trim()),
    })
}

/// Parses the content of /proc/meminfo.
///
/// Only `MemTotal` and `MemAvailable` are required; values are in kB.
pub fn parse_meminfo(content: &str, path: &Path) -> Result<MemoryInfo, MetricsError> {
    let mut total_bytes: Option<u64> = None;
    let mut available_bytes: Option<u64> = None;

    for line in content.lines() {
        if line.starts_with("MemTotal:") {
            total_bytes = Some(parse_kb_value(line, path)? * 1024);
        } else if line.starts_with("MemAvailable:") {
            available_bytes = Some(parse_kb_value(line, path)? * 1024);
        }

        if total_bytes.is_some() && available_bytes.is_some() {
            break;
        }
    }

    let total_bytes = total_bytes.ok_or_else(|| MetricsError::MissingField {
        path: path.to_path_buf(),
        field: "MemTotal",
    })?;
    let available_bytes = available_bytes.ok_or_else(|| MetricsError::MissingField {
        path: path.to_path_buf(),
        field: "MemAvailable",
    })?;

    if total_bytes == 0 {
        return Err(MetricsError::Parse {
            path: path.to_path_buf(),
            reason: "MemTotal is zero".to_string(),
        });
    }

    Ok(MemoryInfo {
        total_bytes,
        available_bytes,
    })
}

/// Reads memory totals from `<proc_root>/meminfo`.
pub fn read_memory_info(proc_root: &Path) -> Result<MemoryInfo, MetricsError> {
    let path = proc_root.join("meminfo");
    let content = read_proc_file(&path)?;
    parse_meminfo(&content, &path)
}

/// Tracks the previous /proc/stat reading so each call yields usage since the last one.
#[derive(Debug, Default)]
pub struct CpuUsageTracker {
    previous: Option<CpuStat>,
}

impl CpuUsageTracker {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Records `current` and returns the busy percentage since the previous reading.
    ///
    /// The first call only stores a baseline and returns 0.0, as does a
    /// reading in which no ticks elapsed.
    pub fn update(&mut self, current: CpuStat) -> f64 {
        let percent = match self.previous {
            Some(previous) => {
                let delta_total = current.total().saturating_sub(previous.total());
                let delta_non_active = current.idle_total().saturating_sub(previous.idle_total());

                if delta_total > 0 {
                    delta_total.saturating_sub(delta_non_active) as f64 / delta_total as f64
                        * 100.0
                } else {
                    0.0
                }
            }
            None => 0.0,
        };

        self.previous = Some(current);
        percent
    }
}

/// Rounds a percentage to one decimal place.
pub fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn read_proc_file(path: &Path) -> Result<String, MetricsError> {
    fs::read_to_string(path).map_err(|source| MetricsError::Read {
        path: PathBuf::from(path),
        source,
    })
}

fn parse_kb_value(line: &str, path: &Path) -> Result<u64, MetricsError> {
    line.split_whitespace()
        .nth(1)
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or_else(|| MetricsError::Parse {
            path: path.to_path_buf(),
            reason: format!("bad value in line '{}'", line.trim()),
        })
}
