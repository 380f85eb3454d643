//! Configuration data structures

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default directory for the file-backed store, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = ".planboard/data";

/// Top-level Planboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanboardConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub writes: WritesConfig,
}

impl PlanboardConfig {
    /// Check combinations that parse but cannot be used
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.backend == StoreBackend::File
            && self.store.path.as_os_str().is_empty()
        {
            return Err(ConfigError::invalid_value(
                "store.path",
                "the file backend needs a directory",
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Which entity store backs the context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local, lost on exit
    #[default]
    Memory,
    /// One JSON document per entity under `store.path`
    File,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive such as `info` or `planboard=debug`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritesConfig {
    /// Serialize cascades and reparents that target the same entity id
    pub serialize_per_entity: bool,
}
