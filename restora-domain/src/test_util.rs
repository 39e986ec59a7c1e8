//! Shared helpers for the engine tests.

use crate::workspaces::{Application, WindowState, Workspace};
use restora_core::types::Rect;
use std::path::PathBuf;

/// A plain executable-backed application record.
pub(crate) fn sample_app(name: &str, path: &str, position: Rect) -> Application {
    Application {
        name: name.to_string(),
        path: PathBuf::from(path),
        command_line_args: String::new(),
        app_user_model_id: String::new(),
        package_full_name: String::new(),
        pwa_app_id: String::new(),
        version: String::new(),
        elevated: false,
        position,
        state: WindowState::Normal,
    }
}

/// A workspace wrapping the given applications.
pub(crate) fn sample_workspace(id: &str, apps: Vec<Application>) -> Workspace {
    Workspace {
        id: id.to_string(),
        name: format!("{} (test)", id),
        move_existing_windows: true,
        apps,
    }
}
