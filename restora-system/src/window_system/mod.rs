//! The window-system facade.
//!
//! [`WindowSystem`] is the only view the reconciliation engine has of the
//! desktop. Query operations return `Option` (a window may vanish or deny
//! inspection at any time); mutation operations return a `Result` carrying
//! the underlying OS error. Implementations must be thread-safe: the
//! engine issues minimization calls from a small worker pool.

use restora_core::types::{Monitor, Rect, ShowState, WindowHandle};
use std::path::PathBuf;
use thiserror::Error;

pub mod fake;

/// Errors surfaced by window-system operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowSystemError {
    /// An OS call failed. `operation` names the facade operation and
    /// `code` is the raw OS error code.
    #[error("{operation} failed for window {window}: os error {code}")]
    OsFailure {
        operation: &'static str,
        window: WindowHandle,
        code: i32,
    },

    /// The handle no longer refers to a live window.
    #[error("window {0} is gone")]
    WindowGone(WindowHandle),
}

/// Abstraction over the desktop window system.
///
/// `enumerate_windows` applies the host's user-window filter: invisible
/// windows, tool windows and OS chrome are already excluded. System
/// popups (transient OS dialogs that must never be minimized) are still
/// included and are classified separately by [`WindowSystem::is_system_popup`].
pub trait WindowSystem: Send + Sync {
    /// Visible, user-facing top-level windows in stacking-independent
    /// enumeration order.
    fn enumerate_windows(&self) -> Vec<WindowHandle>;

    /// Whether the window is a transient system popup.
    fn is_system_popup(&self, window: WindowHandle) -> bool;

    /// Absolute path of the executable backing the window's process, when
    /// readable.
    fn process_path(&self, window: WindowHandle) -> Option<PathBuf>;

    /// The app-user-model-id attached to the window, when one is set.
    fn app_user_model_id(&self, window: WindowHandle) -> Option<String>;

    /// The window's current show state, when readable.
    fn show_state(&self, window: WindowHandle) -> Option<ShowState>;

    /// The window's bounding rectangle in virtual-screen coordinates, when
    /// readable.
    fn window_rect(&self, window: WindowHandle) -> Option<Rect>;

    /// All connected monitors.
    fn monitors(&self) -> Vec<Monitor>;

    /// The monitor whose bounds intersect `rect`, if any.
    fn monitor_for_rect(&self, rect: &Rect) -> Option<Monitor> {
        self.monitors().into_iter().find(|m| m.bounds.intersects(rect))
    }

    /// Moves and resizes the window without activating it, changing its
    /// z-order, or repainting stale content.
    fn move_resize(&self, window: WindowHandle, rect: &Rect) -> Result<(), WindowSystemError>;

    /// Makes the window visible without activating it.
    fn show_no_activate(&self, window: WindowHandle) -> Result<(), WindowSystemError>;

    /// Minimizes the window immediately, skipping animations.
    fn force_minimize(&self, window: WindowHandle) -> Result<(), WindowSystemError>;

    /// Maximizes the window.
    fn maximize(&self, window: WindowHandle) -> Result<(), WindowSystemError>;
}
