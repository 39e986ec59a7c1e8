//! Workspace and application records.

use restora_core::types::Rect;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// The saved presentation state an application window is restored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

impl WindowState {
    pub fn is_minimized(&self) -> bool {
        matches!(self, WindowState::Minimized)
    }

    pub fn is_maximized(&self) -> bool {
        matches!(self, WindowState::Maximized)
    }
}

/// One placement record inside a workspace: the identity signals of an
/// application plus the position and state its window is restored to.
///
/// A workspace may contain several records for the same binary at
/// different positions; each is tracked independently. Identity
/// (`PartialEq`, `Hash`) therefore covers path, name, app-user-model-id,
/// PWA id and position, and deliberately ignores the launch-only fields
/// (arguments, package name, version, elevation) and the saved state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Executable-like display name (e.g. `notepad`).
    pub name: String,

    /// Absolute path of the executable; empty for pure packaged apps.
    #[serde(default)]
    pub path: PathBuf,

    /// Command line passed on launch.
    #[serde(default)]
    pub command_line_args: String,

    /// App-user-model-id assigned by the host OS; may be empty.
    #[serde(default)]
    pub app_user_model_id: String,

    /// Packaged-app identifier; may be empty.
    #[serde(default)]
    pub package_full_name: String,

    /// Progressive-web-app id; may be empty.
    #[serde(default)]
    pub pwa_app_id: String,

    /// Integer-parseable record version; gates the PWA launch strategy.
    #[serde(default)]
    pub version: String,

    /// Whether the application must be launched elevated.
    #[serde(default)]
    pub elevated: bool,

    /// Saved window rectangle in virtual-screen coordinates.
    pub position: Rect,

    /// Saved window state.
    #[serde(default)]
    pub state: WindowState,
}

impl PartialEq for Application {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.name == other.name
            && self.app_user_model_id == other.app_user_model_id
            && self.pwa_app_id == other.pwa_app_id
            && self.position == other.position
    }
}

impl Eq for Application {}

impl Hash for Application {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
        self.name.hash(state);
        self.app_user_model_id.hash(state);
        self.pwa_app_id.hash(state);
        self.position.hash(state);
    }
}

impl Application {
    /// Whether two records describe the same application binary,
    /// irrespective of where their windows go.
    pub fn same_app(&self, other: &Application) -> bool {
        self.name == other.name && self.path == other.path
    }

    /// The file name of the saved executable path, for display purposes.
    pub fn path_file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A named, immutable bundle of applications to restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    /// Opaque identifier the workspace is requested by.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Whether already-running windows are repositioned. Missing entries
    /// launch regardless.
    #[serde(default = "default_move_existing_windows")]
    pub move_existing_windows: bool,

    /// Applications in restore order.
    #[serde(default)]
    pub apps: Vec<Application>,
}

fn default_move_existing_windows() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;
    use std::collections::hash_map::DefaultHasher;

    assert_impl_all!(Application: Eq, std::hash::Hash, Send, Sync);
    assert_impl_all!(Workspace: Clone, Send, Sync);

    use crate::test_util::sample_app;

    fn hash_of(app: &Application) -> u64 {
        let mut hasher = DefaultHasher::new();
        app.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn same_binary_at_different_positions_is_a_different_record() {
        let first = sample_app("editor", "C:\\C.exe", Rect::new(0, 0, 800, 600));
        let second = sample_app("editor", "C:\\C.exe", Rect::new(800, 0, 800, 600));
        assert_ne!(first, second);
        assert!(first.same_app(&second));
    }

    #[test]
    fn launch_only_fields_do_not_affect_identity() {
        let base = sample_app("editor", "C:\\C.exe", Rect::new(0, 0, 800, 600));
        let mut variant = base.clone();
        variant.command_line_args = "--restore".to_string();
        variant.elevated = true;
        variant.state = WindowState::Maximized;

        assert_eq!(base, variant);
        assert_eq!(hash_of(&base), hash_of(&variant));
    }

    #[test]
    fn path_file_name_extracts_the_executable_name() {
        let app = sample_app("edge", "/opt/edge/msedge.exe", Rect::default());
        assert_eq!(app.path_file_name(), "msedge.exe");
        let pathless = sample_app("store-app", "", Rect::default());
        assert_eq!(pathless.path_file_name(), "");
    }

    #[test]
    fn workspace_deserializes_with_defaults() {
        let json = r#"{
            "id": "ws-1",
            "name": "Morning",
            "apps": [
                {
                    "name": "notepad",
                    "path": "C:\\Windows\\notepad.exe",
                    "position": { "x": 0, "y": 0, "width": 640, "height": 480 }
                }
            ]
        }"#;
        let workspace: Workspace = serde_json::from_str(json).unwrap();
        assert!(workspace.move_existing_windows);
        assert_eq!(workspace.apps.len(), 1);
        assert_eq!(workspace.apps[0].state, WindowState::Normal);
        assert!(!workspace.apps[0].elevated);
        assert!(workspace.apps[0].app_user_model_id.is_empty());
    }

    #[test]
    fn window_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&WindowState::Maximized).unwrap(),
            "\"maximized\""
        );
    }
}
