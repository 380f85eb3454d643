//! Configuration provider using Figment

use crate::{
    discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery},
    error::ConfigError,
    types::PlanboardConfig,
    ConfigResult,
};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Prefix for environment overrides; `__` separates nested keys
pub const ENV_PREFIX: &str = "PLANBOARD_";

/// Loads [`PlanboardConfig`] from every source, later sources winning:
///
/// 1. built-in defaults
/// 2. `~/.planboard/planboard.*`
/// 3. `./.planboard/planboard.*`
/// 4. `PLANBOARD_*` environment variables (`PLANBOARD_STORE__BACKEND=file`)
/// 5. an explicit file, when one was given
///
/// Nothing is cached; every call re-reads the sources.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
    explicit_file: Option<PathBuf>,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default directory discovery
    pub fn with_discovery(mut self, discovery: FileDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// Merge this file last, above the environment
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Build, extract and validate the configuration
    pub fn load(&self) -> ConfigResult<PlanboardConfig> {
        let config: PlanboardConfig = self.build_figment()?.extract()?;
        config.validate()?;
        info!(
            backend = %config.store.backend,
            path = %config.store.path.display(),
            serialize_per_entity = config.writes.serialize_per_entity,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        debug!("Building figment configuration with precedence order");

        let mut figment = Figment::from(Serialized::defaults(PlanboardConfig::default()));
        for file in self.discovery.discover_all() {
            figment = figment.merge(Self::file_provider(&file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = &self.explicit_file {
            let file = Self::explicit(path)?;
            figment = figment.merge(Self::file_provider(&file));
        }
        Ok(figment)
    }

    fn explicit(path: &Path) -> ConfigResult<ConfigFile> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        Ok(ConfigFile::new(
            path.to_path_buf(),
            format,
            ConfigScope::Explicit,
        ))
    }

    fn file_provider(file: &ConfigFile) -> Figment {
        trace!(
            "Loading config file: {} ({:?}, {:?})",
            file.path.display(),
            file.format,
            file.scope
        );
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
            ConfigFormat::Json => Figment::from(Json::file(&file.path)),
        }
    }
}

/// Load configuration from the default locations plus an optional explicit file
pub fn load_configuration(explicit_file: Option<&Path>) -> ConfigResult<PlanboardConfig> {
    let provider = ConfigProvider::new();
    match explicit_file {
        Some(path) => provider.with_file(path).load(),
        None => provider.load(),
    }
}
