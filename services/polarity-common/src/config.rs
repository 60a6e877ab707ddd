//! Configuration management for the Polarity service.
//!
//! Configuration lives in a single JSON file at `~/.polarity/config.json`.
//! The path can be overridden with `POLARITY_CONFIG`.
//!
//! # Configuration Priority
//!
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables (`.env` is loaded first, real env wins)
//!
//! # Environment Variable Mapping
//!
//! - `POLARITY_STORE_URI` → store.uri (`MONGODB_URI` is accepted as a fallback)
//! - `POLARITY_BIND_ADDRESS` → network.bind
//! - `POLARITY_PORT` → network.port
//! - `POLARITY_LOG_LEVEL` → observability.log_level
//! - `POLARITY_LOG_FORMAT` → observability.log_format

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::validation::{ValidationError, ValidationResult};

/// Environment variable that points at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "POLARITY_CONFIG";

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".polarity"),
        |dirs| dirs.home_dir().join(".polarity"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| config_dir().join("config.json"))
}

// ============================================================================
// Network Configuration
// ============================================================================

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Bind address. Default: "0.0.0.0"
    #[serde(default = "default_bind_address")]
    pub bind: String,

    /// Listen port. Default: 5000
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

// ============================================================================
// Store Configuration
// ============================================================================

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection URI for the record store.
    ///
    /// Supported forms: `sqlite://<path>`, `sqlite::memory:`, or a bare path.
    #[serde(default = "default_store_uri")]
    pub uri: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: default_store_uri(),
        }
    }
}

fn default_store_uri() -> String {
    "sqlite://polarity.db".into()
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets clamped to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure for the Polarity service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP listener
    #[serde(default)]
    pub network: NetworkConfig,

    /// Record store
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with `.env` and environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        // A missing .env is the normal case
        let _ = dotenvy::dotenv();

        let mut config = Self::load()?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) -> ValidationResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// A value that cannot be parsed into its field is an error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ValidationResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("POLARITY_STORE_URI").or_else(|| lookup("MONGODB_URI")) {
            self.store.uri = uri;
        }

        if let Some(bind) = lookup("POLARITY_BIND_ADDRESS") {
            self.network.bind = bind;
        }

        if let Some(port) = lookup("POLARITY_PORT") {
            self.network.port = port.trim().parse().map_err(|_| ValidationError::InvalidValue {
                field: "network.port".into(),
                reason: format!("POLARITY_PORT '{port}' is not a port number"),
            })?;
        }

        if let Some(level) = lookup("POLARITY_LOG_LEVEL") {
            self.observability.log_level = level;
        }

        if let Some(format) = lookup("POLARITY_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn listen_address(&self) -> String {
        match self.network.bind.parse::<std::net::IpAddr>() {
            Ok(ip) => std::net::SocketAddr::new(ip, self.network.port).to_string(),
            Err(_) => format!("{}:{}", self.network.bind, self.network.port),
        }
    }
}
