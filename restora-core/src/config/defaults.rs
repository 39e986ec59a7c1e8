//! Default configuration values.
//!
//! These functions back the `#[serde(default = ...)]` attributes on the
//! configuration structures, so a partially specified `config.toml` fills
//! in with sensible values.

use super::{ChannelConfig, LoggingConfig, StorageConfig, WindowSystemConfig};
use std::path::PathBuf;

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub fn default_log_format() -> String {
    "text".to_string()
}

pub fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub fn default_socket_name() -> String {
    "restora.sock".to_string()
}

pub fn default_channel_config() -> ChannelConfig {
    ChannelConfig {
        socket_name: default_socket_name(),
    }
}

pub fn default_storage_config() -> StorageConfig {
    StorageConfig {
        workspaces_file: None,
        temp_workspaces_file: None,
        apps_file: None,
    }
}

pub fn default_window_system_config() -> WindowSystemConfig {
    WindowSystemConfig { backend: None }
}
