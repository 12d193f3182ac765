//! CLI arguments for track-cpu-load.
//!
//! This module defines the command-line interface structure using the clap library.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "track-cpu-load",
    about = "Record host CPU and memory utilization to <label>load.csv once per second",
    version,
    after_help = "Each line of the output file is \"<cpu percent>,<memory percent>\"."
)]
pub struct Args {
    /// Prefix for the output file name (<label>load.csv) [default: ""]
    #[arg(short = 'l', long)]
    pub label: Option<String>,

    /// How many seconds to keep sampling [default: 120]
    #[arg(short = 't', long, allow_negative_numbers = true)]
    pub time: Option<i64>,

    /// Log level for diagnostics on stderr
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML); none is read unless given
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unset() {
        let args = Args::try_parse_from(["track-cpu-load"]).unwrap();
        assert!(args.label.is_none());
        assert!(args.time.is_none());
        assert!(args.log_level.is_none());
        assert!(!args.show_config);
        assert_eq!(args.config_format, ConfigFormat::Yaml);
    }

    #[test]
    fn test_short_and_long_flags() {
        let args = Args::try_parse_from(["track-cpu-load", "-l", "test-", "-t", "3"]).unwrap();
        assert_eq!(args.label.as_deref(), Some("test-"));
        assert_eq!(args.time, Some(3));

        let args =
            Args::try_parse_from(["track-cpu-load", "--label", "host1-", "--time", "60"]).unwrap();
        assert_eq!(args.label.as_deref(), Some("host1-"));
        assert_eq!(args.time, Some(60));
    }

    #[test]
    fn test_negative_time_is_accepted() {
        let args = Args::try_parse_from(["track-cpu-load", "-t", "-4"]).unwrap();
        assert_eq!(args.time, Some(-4));
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        assert!(Args::try_parse_from(["track-cpu-load", "-t", "abc"]).is_err());
        assert!(Args::try_parse_from(["track-cpu-load", "--interval", "5"]).is_err());
        assert!(Args::try_parse_from(["track-cpu-load", "extra"]).is_err());
        assert!(Args::try_parse_from(["track-cpu-load", "--no-config"]).is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        let args = Args::try_parse_from(["track-cpu-load", "--log-level", "debug"]).unwrap();
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }
}
