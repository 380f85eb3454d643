//! # Planboard Configuration
//!
//! Layered configuration for the Planboard core and CLI, built on
//! [Figment](https://github.com/SergioBenitez/Figment).
//!
//! ## Sources
//!
//! Later sources override earlier ones:
//!
//! 1. built-in defaults
//! 2. `~/.planboard/planboard.{toml,yaml,yml,json}`
//! 3. `./.planboard/planboard.{toml,yaml,yml,json}`
//! 4. `PLANBOARD_` environment variables, `__` separating nested keys
//! 5. an explicit file (the CLI's `--config`)
//!
//! ## Example
//!
//! ```toml
//! [store]
//! backend = "file"
//! path = ".planboard/data"
//!
//! [logging]
//! level = "planboard=debug"
//!
//! [writes]
//! serialize_per_entity = true
//! ```

/// File discovery for configuration files
pub mod discovery;
/// Error types
pub mod error;
/// Figment-backed loading
pub mod provider;
/// Configuration data structures
pub mod types;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery, CONFIG_DIR_NAME};
pub use error::ConfigError;
pub use provider::{load_configuration, ConfigProvider, ENV_PREFIX};
pub use types::{
    LoggingConfig, PlanboardConfig, StoreBackend, StoreConfig, WritesConfig, DEFAULT_DATA_DIR,
};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
