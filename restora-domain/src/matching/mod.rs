//! Window-to-application identity matching.

pub mod nearest;

pub use nearest::{nearest_window, window_distance, WindowWithDistance};

use crate::workspaces::Application;
use restora_core::types::WindowHandle;
use restora_system::pwa::PwaHelper;
use restora_system::window_system::WindowSystem;
use std::sync::Arc;

/// Decides whether a window belongs to a workspace application.
///
/// Matching applies a strict signal precedence and short-circuits on the
/// first hit:
///
/// 1. equal non-empty app-user-model-ids,
/// 2. equal executable paths,
/// 3. application name equal to the process name (the executable's stem),
/// 4. for applications carrying a PWA id: the window's process is a known
///    browser host and the host's PWA helper resolves the window's AUMID
///    to the same id.
///
/// A window whose process path cannot be read matches nothing. The
/// matcher holds no state of its own; its answer depends only on the
/// facade-observable properties of the window and the application record.
pub struct WindowMatcher {
    window_system: Arc<dyn WindowSystem>,
    pwa: Arc<dyn PwaHelper>,
}

impl WindowMatcher {
    pub fn new(window_system: Arc<dyn WindowSystem>, pwa: Arc<dyn PwaHelper>) -> Self {
        WindowMatcher { window_system, pwa }
    }

    /// Whether `window` belongs to `app`.
    pub fn matches(&self, window: WindowHandle, app: &Application) -> bool {
        let Some(process_path) = self.window_system.process_path(window) else {
            return false;
        };
        if process_path.as_os_str().is_empty() {
            return false;
        }

        let process_name = process_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let window_aumid = self
            .window_system
            .app_user_model_id(window)
            .unwrap_or_default();

        if !window_aumid.is_empty()
            && !app.app_user_model_id.is_empty()
            && app.app_user_model_id == window_aumid
        {
            return true;
        }

        if app.path == process_path {
            return true;
        }

        if app.name == process_name {
            return true;
        }

        if !app.pwa_app_id.is_empty() {
            let host = process_name.to_lowercase();
            let pwa_app_id = match host.as_str() {
                "msedge" => self.pwa.edge_app_id(&window_aumid),
                "chrome" => self.pwa.chrome_app_id(&window_aumid),
                _ => None,
            };
            if pwa_app_id.as_deref() == Some(app.pwa_app_id.as_str()) {
                return true;
            }
        }

        false
    }
}
