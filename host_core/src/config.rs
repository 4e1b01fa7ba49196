use std::fs;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use logger::LoggingConfig;
use serde::Deserialize;

use crate::error::ConfigError;

/// File read when `PLUGIN_HOST_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "host_config.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "PLUGIN_HOST_CONFIG";

/// The `[host]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostSettings {
    /// Overrides the parallelism reported by diagnostics. Defaults to
    /// `std::thread::available_parallelism()`.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub host: HostSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HostConfig {
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: HostConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.host.parallelism == Some(0) {
            return Err(ConfigError::ZeroParallelism);
        }
        Ok(config)
    }

    /// Reads `path`. A missing file is not an error: defaults apply.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents, path),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Path named by `PLUGIN_HOST_CONFIG`, or `host_config.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Loads from [`HostConfig::default_path`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Self::default_path())
    }

    /// Configured parallelism, falling back to what the OS reports, never below 1.
    pub fn parallelism(&self) -> usize {
        self.host
            .parallelism
            .filter(|p| *p > 0)
            .unwrap_or_else(|| thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1))
    }
}
