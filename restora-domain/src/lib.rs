//! The workspace reconciliation engine.
//!
//! Given a saved workspace (a named bundle of applications with per-window
//! geometry), the engine reconciles the running desktop with it: matching
//! already-running windows to saved applications and repositioning them,
//! launching whatever is missing, placing the windows that appear, and
//! minimizing everything unrelated without disturbing workspace-owned
//! windows.
//!
//! The engine is deliberately synchronous: one request runs on one thread,
//! waits are real sleeps, and the only fan-out is a small worker pool for
//! the minimization sweep. All system access goes through the facade
//! traits in `restora-system`.

pub mod launching;
#[cfg(test)]
pub(crate) mod test_util;
pub mod matching;
pub mod placement;
pub mod reconcile;
pub mod service;
pub mod workspaces;

pub use launching::{
    AppLaunchEngine, LaunchError, LaunchState, LaunchingAppState, LaunchingStatus,
};
pub use matching::{nearest_window, window_distance, WindowMatcher, WindowWithDistance};
pub use placement::{PlacementError, WindowPlacer};
pub use reconcile::{ReconcileSummary, WorkspaceReconciler};
pub use service::{ReconcileError, WorkspacesService};
pub use workspaces::{
    Application, JsonWorkspaceStore, WindowState, Workspace, WorkspaceStore, WorkspaceStoreError,
};
