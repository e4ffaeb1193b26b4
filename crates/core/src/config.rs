//! Configuration management -- `roadcheck.toml` parsing and overrides.
//!
//! [`RoadcheckConfig`] is the top-level configuration structure. Loading
//! precedence, highest first:
//! 1. CLI arguments (applied by the caller)
//! 2. Environment variables (`ROADCHECK_GENERAL_LOG_LEVEL=debug` form)
//! 3. Config file (`roadcheck.toml`)
//! 4. Defaults (`Default` implementations)

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, RoadcheckError};

/// Top-level configuration, one section per concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadcheckConfig {
    /// Logging and general settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Violation store settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// `[general]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    GeneralConfig::default().log_level
}

fn default_log_format() -> String {
    GeneralConfig::default().log_format
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Default SQLite database path for persistence and query commands.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    StorageConfig::default().db_path
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "roadcheck.db".to_owned(),
        }
    }
}

impl RoadcheckConfig {
    /// Load from a TOML file and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RoadcheckError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file without environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RoadcheckError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RoadcheckError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                RoadcheckError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file if it exists, otherwise fall back to defaults.
    ///
    /// Environment overrides apply in both cases. Used by the CLI, where a
    /// missing config file is not an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, RoadcheckError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, RoadcheckError> {
        toml::from_str(toml_str).map_err(|e| {
            RoadcheckError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// Apply `ROADCHECK_{SECTION}_{FIELD}` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "ROADCHECK_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "ROADCHECK_GENERAL_LOG_FORMAT");
        override_string(&mut self.storage.db_path, "ROADCHECK_STORAGE_DB_PATH");
    }

    /// Validate field values.
    pub fn validate(&self) -> Result<(), RoadcheckError> {
        match self.general.log_format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(RoadcheckError::Config(ConfigError::InvalidValue {
                    field: "general.log_format".to_owned(),
                    reason: format!("'{other}' is not one of: pretty, json"),
                }));
            }
        }
        if self.storage.db_path.is_empty() {
            return Err(RoadcheckError::Config(ConfigError::InvalidValue {
                field: "storage.db_path".to_owned(),
                reason: "must not be empty".to_owned(),
            }));
        }
        Ok(())
    }
}

fn override_string(field: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var) {
        if value.is_empty() {
            warn!(var, "ignoring empty environment override");
        } else {
            *field = value;
        }
    }
}
