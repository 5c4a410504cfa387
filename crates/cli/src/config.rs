//! Configuration file support
//!
//! Read from `~/.winstatus/config.toml`. A missing or unreadable file yields
//! the defaults; command-line flags override whatever is loaded here.

use crate::logging::{LogFormat, LogLevel};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration from ~/.winstatus/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output settings
    pub output: OutputConfig,
    /// Diagnostics settings
    pub logging: LoggingConfig,
    /// Collector behaviour
    pub collector: CollectorConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default payload format for `procs`
    pub format: OutputFormat,
    /// Disable colored output by default
    pub no_color: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Enable SeDebugPrivilege before collecting (only effective when elevated)
    pub enable_debug_privilege: bool,
}

/// Payload format for the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON object keyed by PID
    #[default]
    Json,
    /// JSON on a single line
    Compact,
    /// Human-readable table
    Table,
}

/// Get the config file path
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".winstatus").join("config.toml"))
}

/// Load configuration from the default location
pub fn load_config() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => Config::default(),
    }
}

/// Load configuration from `path`, falling back to defaults
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            eprintln!(
                "warning: ignoring invalid config file {}: {}",
                path.display(),
                e
            );
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

/// Generate a sample config file content
pub fn sample_config() -> &'static str {
    r#"# winstatus configuration file
# Place this file at ~/.winstatus/config.toml

[output]
# Payload format for `winstatus procs`: "json", "compact" or "table"
format = "json"
# Disable colored output
no_color = false

[logging]
# One of: trace, debug, info, warn, error, off
# WINSTATUS_LOG or RUST_LOG override this
level = "warn"
# "human" or "json"
format = "human"

[collector]
# Enable SeDebugPrivilege before collecting so more owners and command lines
# resolve (requires an elevated prompt)
enable_debug_privilege = false
"#
}
