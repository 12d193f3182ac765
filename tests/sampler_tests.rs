//! Integration tests for the sampling loop.
//!
//! These tests drive `Sampler::run` with a scripted metrics source and a
//! short interval, then inspect the CSV file it leaves behind.

use std::fs;
use std::time::Duration;

use track_cpu_load::{MetricsError, MetricsSource, SampleError, Sampler};

/// Metrics source returning a fixed sequence of readings.
struct ScriptedSource {
    cpu: Vec<f64>,
    memory: f64,
    calls: usize,
    fail_after: Option<usize>,
}

impl ScriptedSource {
    fn new(cpu: Vec<f64>, memory: f64) -> Self {
        Self {
            cpu,
            memory,
            calls: 0,
            fail_after: None,
        }
    }
}

impl MetricsSource for ScriptedSource {
    fn cpu_percent(&mut self) -> Result<f64, MetricsError> {
        if self.fail_after.is_some_and(|n| self.calls >= n) {
            return Err(MetricsError::MissingField {
                path: "/proc/stat".into(),
                field: "cpu",
            });
        }
        let value = self.cpu[self.calls % self.cpu.len()];
        self.calls += 1;
        Ok(value)
    }

    fn memory_percent(&mut self) -> Result<f64, MetricsError> {
        Ok(self.memory)
    }
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_zero_duration_creates_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("load.csv");
    let mut source = ScriptedSource::new(vec![1.0], 2.0);

    let written = Sampler::new(&path, Duration::ZERO)
        .run(&mut source)
        .unwrap();

    assert_eq!(written, 0);
    assert_eq!(source.calls, 0);
    assert!(path.exists());
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_line_count_tracks_duration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test-load.csv");
    let mut source = ScriptedSource::new(vec![3.2, 4.0], 41.7);

    // 300ms window with a 100ms interval: about 3 samples
    let written = Sampler::new(&path, Duration::from_millis(300))
        .with_interval(Duration::from_millis(100))
        .run(&mut source)
        .unwrap();

    let lines = read_lines(&path);
    assert_eq!(lines.len(), written);
    assert!((2..=4).contains(&written), "wrote {} samples", written);
    assert_eq!(lines[0], "3.2,41.7");
    assert_eq!(lines[1], "4.0,41.7");
}

#[test]
fn test_lines_are_two_percentages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("load.csv");
    let mut source = ScriptedSource::new(vec![0.0, 100.0, 57.25], 12.5);

    Sampler::new(&path, Duration::from_millis(100))
        .with_interval(Duration::from_millis(20))
        .run(&mut source)
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.ends_with('\n'));
    for line in content.lines() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 2, "bad line {:?}", line);
        for field in fields {
            let value: f64 = field.parse().unwrap();
            assert!((0.0..=100.0).contains(&value));
        }
    }
}

#[test]
fn test_rerun_truncates_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("host1-load.csv");
    fs::write(&path, "old,data\nold,data\nold,data\n").unwrap();

    let mut source = ScriptedSource::new(vec![1.0], 1.0);
    Sampler::new(&path, Duration::ZERO).run(&mut source).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_missing_directory_fails_before_sampling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("load.csv");
    let mut source = ScriptedSource::new(vec![1.0], 1.0);

    let err = Sampler::new(&path, Duration::from_secs(5))
        .run(&mut source)
        .unwrap_err();

    assert!(matches!(err, SampleError::CreateOutput { .. }));
    assert_eq!(source.calls, 0);
    assert!(!path.exists());
}

#[test]
fn test_metrics_failure_keeps_flushed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("load.csv");
    let mut source = ScriptedSource::new(vec![5.0], 50.0);
    source.fail_after = Some(2);

    let err = Sampler::new(&path, Duration::from_secs(5))
        .with_interval(Duration::from_millis(10))
        .run(&mut source)
        .unwrap_err();

    assert!(matches!(err, SampleError::Metrics(_)));
    assert_eq!(read_lines(&path), vec!["5.0,50.0", "5.0,50.0"]);
}
