//! Configuration management for track-cpu-load.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Default configuration constants
pub const DEFAULT_LABEL: &str = "";
pub const DEFAULT_TIME_SECONDS: i64 = 120;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Effective configuration of one sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Output file prefix
    pub label: Option<String>,
    /// Sampling duration in seconds
    pub time: Option<i64>,
    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            label: Some(DEFAULT_LABEL.to_string()),
            time: Some(DEFAULT_TIME_SECONDS),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub fn time(&self) -> i64 {
        self.time.unwrap_or(DEFAULT_TIME_SECONDS)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Fills unset fields from the defaults.
    fn with_defaults(self) -> Self {
        let defaults = Config::default();
        Self {
            label: self.label.or(defaults.label),
            time: self.time.or(defaults.time),
            log_level: self.log_level.or(defaults.log_level),
        }
    }
}

/// Validate effective config (used at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let level = cfg.log_level();
    if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        return Err(format!(
            "Invalid log_level '{}', expected one of: {}",
            level,
            LOG_LEVELS.join(", ")
        )
        .into());
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(label) = &args.label {
        config.label = Some(label.clone());
    }
    if let Some(time) = args.time {
        config.time = Some(time);
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }

    Ok(config)
}

/// Loads the config file given with `-c`.
///
/// No file is ever read implicitly: without a path the built-in defaults are
/// returned. An explicitly given path must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    if !path.exists() {
        return Err(format!("Config file not found: {}", path.display()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        // Default to YAML
        _ => serde_yaml::from_str(&content)?,
    };

    Ok(config.with_defaults())
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, format)?);
    Ok(())
}

/// Serializes configuration in the requested format.
pub fn render_config(
    config: &Config,
    format: ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}
