//! Application configuration loaded from a TOML file
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [database]
//! url = "sqlite://./parking.db?mode=rwc"
//! query_timeout_ms = 5000
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [sensors]
//! occupancy_threshold_cm = 3
//!
//! [cascade]
//! chain_arduino_to_slots = true
//! ```
//!
//! Every section and key is optional. `DATABASE_URL` overrides `database.url`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::parking_slot::OCCUPANCY_THRESHOLD_CM;
use crate::domain::sensor::MAX_DISTANCE_CM;
use crate::infrastructure::DatabaseConfig;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub sensors: SensorsConfig,
    pub cascade: CascadeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight work on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    /// Distance below which a slot counts as occupied
    pub occupancy_threshold_cm: i32,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            occupancy_threshold_cm: OCCUPANCY_THRESHOLD_CM,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Reconcile slots right after an Arduino forces its sensors into
    /// maintenance, instead of waiting for the next reading
    pub chain_arduino_to_slots: bool,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            chain_arduino_to_slots: true,
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.database.url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.sensors.occupancy_threshold_cm;
        if !(0..=MAX_DISTANCE_CM).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "sensors.occupancy_threshold_cm must be within 0..={}, got {}",
                MAX_DISTANCE_CM, threshold
            )));
        }
        if self.database.pool.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.pool.max_connections must be at least 1".into(),
            ));
        }
        if self.database.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "database.query_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// `~/.config/smart-parking/config.toml`, or `./config.toml` when no
/// config directory is known.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("smart-parking").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
