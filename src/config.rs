// src/config.rs

//! Manages server configuration: loading from TOML and validation.

use crate::core::protocol::line_codec::DEFAULT_MAX_LINE_LENGTH;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// The smallest accepted `max_line_length`. A full `Add Lecture` line must fit.
const MIN_LINE_LENGTH: usize = 64;

/// Configuration for the Prometheus metrics exporter.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MetricsConfig {
    /// If true, an HTTP server will be started to expose Prometheus metrics.
    #[serde(default)]
    pub enabled: bool,
    /// The port for the Prometheus metrics server.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

fn default_metrics_port() -> u16 {
    9291
}

/// The validated server configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Maximum number of concurrent connections. `0` means unlimited.
    #[serde(default)]
    pub max_clients: usize,
    /// Seconds a connection may stay silent before it is closed. `0` disables the timeout.
    #[serde(default)]
    pub idle_timeout_secs: u64,
    /// Upper bound, in bytes, on a single request line.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    291
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_clients: 0,
            idle_timeout_secs: 0,
            max_line_length: default_max_line_length(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid configuration in '{}'", path.display()))?;
        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// The idle timeout as a `Duration`, if enabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.max_line_length < MIN_LINE_LENGTH {
            return Err(anyhow!(
                "max_line_length must be at least {MIN_LINE_LENGTH} bytes"
            ));
        }
        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(anyhow!("metrics.port cannot be 0"));
            }
            if self.metrics.port == self.port {
                return Err(anyhow!("metrics.port must differ from port"));
            }
        }
        if self.port < 1024 {
            warn!(
                "port {} is privileged; binding may require elevated permissions.",
                self.port
            );
        }
        Ok(())
    }
}
