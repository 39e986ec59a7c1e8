//! Standard directory resolution.
//!
//! Resolves the XDG base directories used by the service via the
//! `directories-next` crate, plus the runtime directory that hosts the
//! request socket.

use crate::error::{ConfigError, CoreError};
use directories_next::ProjectDirs;
use std::path::PathBuf;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Restora";
const APPLICATION: &str = "Restora";

fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: "Project Base".to_string(),
        })
    })
}

/// The Restora configuration directory (typically
/// `~/.config/restora` on Linux).
pub fn config_dir() -> Result<PathBuf, CoreError> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// The Restora data directory (typically
/// `~/.local/share/restora` on Linux).
pub fn data_dir() -> Result<PathBuf, CoreError> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// The per-user runtime directory that hosts the request socket.
///
/// Uses `XDG_RUNTIME_DIR` when set and falls back to the system temporary
/// directory otherwise.
pub fn runtime_dir() -> PathBuf {
    std::env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}
