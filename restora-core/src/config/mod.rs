//! Configuration management for the Restora service.
//!
//! [`CoreConfig`] is loaded from a `config.toml` file by [`ConfigLoader`],
//! which searches an explicit override (the `RESTORA_CONFIG` environment
//! variable) followed by the XDG configuration directory. Missing files are
//! not an error at the call sites that use [`ConfigLoader::load_or_default`];
//! the defaults from [`defaults`] apply instead.

use crate::error::{ConfigError, CoreError};
use crate::utils::paths;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub mod defaults;

/// Environment variable naming an explicit configuration file path.
pub const CONFIG_PATH_ENV: &str = "RESTORA_CONFIG";

/// Top-level configuration for the Restora service.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    /// Logging configuration settings.
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,

    /// Request channel settings.
    #[serde(default = "defaults::default_channel_config")]
    pub channel: ChannelConfig,

    /// Locations of the workspace stores.
    #[serde(default = "defaults::default_storage_config")]
    pub storage: StorageConfig,

    /// Window-system backend selection.
    #[serde(default = "defaults::default_window_system_config")]
    pub window_system: WindowSystemConfig,
}

/// Configuration for the logging subsystem.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// The minimum log level to output ("trace" through "error").
    #[serde(default = "defaults::default_log_level")]
    pub level: String,

    /// Optional path to a file where logs should be written in addition to
    /// the console.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,

    /// The format for log messages ("text" or "json").
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Configuration for the local request channel.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// File name of the listening socket, created under the runtime
    /// directory.
    #[serde(default = "defaults::default_socket_name")]
    pub socket_name: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        defaults::default_channel_config()
    }
}

/// Locations of the read-only stores consumed by the service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the main workspace store (a JSON array of workspaces).
    /// Defaults to `workspaces.json` under the Restora data directory.
    #[serde(default)]
    pub workspaces_file: Option<PathBuf>,

    /// Path of the single-entry temporary workspace store. Defaults to
    /// `temp-workspace.json` under the Restora data directory.
    #[serde(default)]
    pub temp_workspaces_file: Option<PathBuf>,

    /// Optional path of an installed-application inventory file (a JSON
    /// array of application records). When absent the inventory is empty.
    #[serde(default)]
    pub apps_file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        defaults::default_storage_config()
    }
}

impl StorageConfig {
    /// Resolves the main workspace store path, applying the data-directory
    /// default when unset.
    pub fn workspaces_path(&self) -> Result<PathBuf, CoreError> {
        match &self.workspaces_file {
            Some(path) => Ok(path.clone()),
            None => Ok(paths::data_dir()?.join("workspaces.json")),
        }
    }

    /// Resolves the temporary workspace store path, applying the
    /// data-directory default when unset.
    pub fn temp_workspaces_path(&self) -> Result<PathBuf, CoreError> {
        match &self.temp_workspaces_file {
            Some(path) => Ok(path.clone()),
            None => Ok(paths::data_dir()?.join("temp-workspace.json")),
        }
    }
}

/// Available window-system backends.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WindowSystemBackend {
    /// The in-memory backend: the full pipeline runs, but no real
    /// desktop windows exist. For development and driving the service
    /// from tests.
    Headless,
}

/// Configuration of the window-system facade implementation.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WindowSystemConfig {
    /// The backend to run against. There is no default: the service
    /// refuses to start rather than silently reconcile against an empty
    /// desktop. Platform adapters are supplied by host integrations.
    #[serde(default)]
    pub backend: Option<WindowSystemBackend>,
}

impl Default for WindowSystemConfig {
    fn default() -> Self {
        defaults::default_window_system_config()
    }
}

/// Loads [`CoreConfig`] from disk.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration from the first existing candidate location.
    ///
    /// Candidates, in order: the path named by `RESTORA_CONFIG`, then
    /// `config.toml` under the Restora configuration directory.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when no candidate exists, or the read,
    /// parse, or validation error for the first candidate that does.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let mut candidates = Vec::new();
        if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
            candidates.push(PathBuf::from(explicit));
        }
        if let Ok(config_dir) = paths::config_dir() {
            candidates.push(config_dir.join("config.toml"));
        }

        for candidate in &candidates {
            if candidate.exists() {
                return Self::load_from_path(candidate);
            }
        }

        Err(CoreError::Config(ConfigError::NotFound {
            locations: candidates,
        }))
    }

    /// Loads and validates the configuration from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let config: CoreConfig = toml::from_str(&content)
            .map_err(|e| CoreError::Config(ConfigError::ParseError(e)))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Like [`ConfigLoader::load`], but a missing configuration file yields
    /// the defaults instead of an error.
    pub fn load_or_default() -> Result<CoreConfig, CoreError> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(CoreError::Config(ConfigError::NotFound { .. })) => Ok(CoreConfig::default()),
            Err(e) => Err(e),
        }
    }

    fn validate(config: &CoreConfig) -> Result<(), CoreError> {
        match config.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "unknown log level '{}'",
                    other
                ))));
            }
        }
        match config.logging.format.to_lowercase().as_str() {
            "text" | "json" => {}
            other => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "unknown log format '{}'",
                    other
                ))));
            }
        }
        if config.channel.socket_name.is_empty() {
            return Err(CoreError::Config(ConfigError::ValidationError(
                "channel.socket_name must not be empty".to_string(),
            )));
        }
        Ok(())
    }
}
