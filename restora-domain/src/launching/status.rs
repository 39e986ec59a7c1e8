//! The request-wide launch status tracker.

use super::state::{LaunchState, LaunchingAppState};
use crate::workspaces::{Application, Workspace};
use restora_core::types::WindowHandle;
use std::sync::RwLock;
use tracing::{debug, warn};

/// Tracks every application of one request through the launch state
/// machine.
///
/// The workspace is copied in at construction so every consumer observes
/// the same immutable view for the request's lifetime. Entries keep
/// workspace order, which makes [`LaunchingStatus::next`] fair: the first
/// waiting application is always returned, and each one leaves `Waiting`
/// before the next query.
///
/// Reads take the lock shared and writes take it exclusively. Within a
/// request only the request thread writes, but external arrangers may
/// advance states concurrently through the same tracker.
pub struct LaunchingStatus {
    workspace: Workspace,
    entries: RwLock<Vec<LaunchingAppState>>,
}

impl LaunchingStatus {
    /// Builds the tracker with every application in `Waiting`.
    ///
    /// Records that are fully identical (same identity, including
    /// position) are collapsed into one entry; they would be
    /// indistinguishable to every query.
    pub fn new(workspace: &Workspace) -> Self {
        let mut entries: Vec<LaunchingAppState> = Vec::with_capacity(workspace.apps.len());
        for app in &workspace.apps {
            if entries.iter().any(|e| &e.application == app) {
                warn!(app = %app.name, "duplicate application record collapsed");
                continue;
            }
            entries.push(LaunchingAppState::waiting(app.clone()));
        }
        LaunchingStatus {
            workspace: workspace.clone(),
            entries: RwLock::new(entries),
        }
    }

    /// The workspace this tracker was built from.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Every application is `LaunchedAndMoved`.
    pub fn all_launched_and_moved(&self) -> bool {
        self.entries
            .read()
            .unwrap()
            .iter()
            .all(|e| e.state == LaunchState::LaunchedAndMoved)
    }

    /// Every already-started instance of the same application binary has
    /// been placed.
    ///
    /// Instances still in `Waiting` (including `app` itself) do not count
    /// as started and never block.
    pub fn all_instances_launched_and_moved(&self, app: &Application) -> bool {
        self.entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.application.same_app(app) && e.state != LaunchState::Waiting)
            .all(|e| e.state == LaunchState::LaunchedAndMoved)
    }

    /// Snapshot of every entry, in workspace order.
    pub fn snapshot(&self) -> Vec<LaunchingAppState> {
        self.entries.read().unwrap().clone()
    }

    /// The first application currently in `state`.
    pub fn next(&self, state: LaunchState) -> Option<LaunchingAppState> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .find(|e| e.state == state)
            .cloned()
    }

    /// Transitions `app` to `state`.
    pub fn update(&self, app: &Application, state: LaunchState) {
        let mut entries = self.entries.write().unwrap();
        match entries.iter_mut().find(|e| &e.application == app) {
            Some(entry) => {
                debug!(app = %app.name, from = ?entry.state, to = ?state, "launch state updated");
                entry.state = state;
            }
            None => warn!(app = %app.name, "state update for untracked application"),
        }
    }

    /// Transitions `app` to `state` and binds `window` to it.
    pub fn update_with_window(&self, app: &Application, window: WindowHandle, state: LaunchState) {
        let mut entries = self.entries.write().unwrap();
        match entries.iter_mut().find(|e| &e.application == app) {
            Some(entry) => {
                debug!(app = %app.name, %window, from = ?entry.state, to = ?state, "launch state updated with window");
                entry.window = Some(window);
                entry.state = state;
            }
            None => warn!(app = %app.name, "state update for untracked application"),
        }
    }

    /// Transitions every non-terminal application to `Canceled`.
    ///
    /// Called when a request ends while applications are still pending,
    /// so the final accounting carries no dangling in-flight states.
    pub fn cancel(&self) {
        let mut entries = self.entries.write().unwrap();
        for entry in entries.iter_mut() {
            if !entry.state.is_terminal() {
                debug!(app = %entry.application.name, from = ?entry.state, "launch canceled");
                entry.state = LaunchState::Canceled;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{sample_app, sample_workspace};
    use restora_core::types::Rect;

    fn two_instance_workspace() -> Workspace {
        sample_workspace(
            "ws",
            vec![
                sample_app("editor", "C:\\C.exe", Rect::new(0, 0, 800, 600)),
                sample_app("editor", "C:\\C.exe", Rect::new(800, 0, 800, 600)),
            ],
        )
    }

    fn state_of(status: &LaunchingStatus, app: &Application) -> LaunchState {
        status
            .snapshot()
            .into_iter()
            .find(|e| &e.application == app)
            .expect("application is tracked")
            .state
    }

    #[test]
    fn starts_with_every_app_waiting() {
        let workspace = two_instance_workspace();
        let status = LaunchingStatus::new(&workspace);
        let snapshot = status.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|e| e.state == LaunchState::Waiting));
        assert!(snapshot.iter().all(|e| e.window.is_none()));
        assert_eq!(status.workspace().id, "ws");
    }

    #[test]
    fn fully_identical_records_collapse() {
        let app = sample_app("editor", "C:\\C.exe", Rect::new(0, 0, 800, 600));
        let workspace = sample_workspace("ws", vec![app.clone(), app]);
        let status = LaunchingStatus::new(&workspace);
        assert_eq!(status.snapshot().len(), 1);
    }

    #[test]
    fn next_returns_entries_in_workspace_order() {
        let workspace = two_instance_workspace();
        let status = LaunchingStatus::new(&workspace);

        let first = status.next(LaunchState::Waiting).unwrap();
        assert_eq!(first.application, workspace.apps[0]);

        status.update(&workspace.apps[0], LaunchState::Launched);
        let second = status.next(LaunchState::Waiting).unwrap();
        assert_eq!(second.application, workspace.apps[1]);

        status.update(&workspace.apps[1], LaunchState::Failed);
        assert!(status.next(LaunchState::Waiting).is_none());
    }

    #[test]
    fn updates_target_the_exact_instance() {
        let workspace = two_instance_workspace();
        let status = LaunchingStatus::new(&workspace);
        status.update(&workspace.apps[1], LaunchState::Launched);

        assert_eq!(state_of(&status, &workspace.apps[0]), LaunchState::Waiting);
        assert_eq!(state_of(&status, &workspace.apps[1]), LaunchState::Launched);
    }

    #[test]
    fn all_launched_and_moved_tracks_the_whole_workspace() {
        let workspace = two_instance_workspace();
        let status = LaunchingStatus::new(&workspace);
        assert!(!status.all_launched_and_moved());

        status.update(&workspace.apps[0], LaunchState::LaunchedAndMoved);
        assert!(!status.all_launched_and_moved());

        status.update(&workspace.apps[1], LaunchState::LaunchedAndMoved);
        assert!(status.all_launched_and_moved());
    }

    #[test]
    fn waiting_instances_never_block_the_sequencing_check() {
        let workspace = two_instance_workspace();
        let status = LaunchingStatus::new(&workspace);

        // Nothing started yet: the first instance may launch immediately.
        assert!(status.all_instances_launched_and_moved(&workspace.apps[0]));

        // The first instance is started but not yet placed: the second
        // must hold.
        status.update(&workspace.apps[0], LaunchState::Launched);
        assert!(!status.all_instances_launched_and_moved(&workspace.apps[1]));

        // Once placed, the second may proceed.
        status.update(&workspace.apps[0], LaunchState::LaunchedAndMoved);
        assert!(status.all_instances_launched_and_moved(&workspace.apps[1]));
    }

    #[test]
    fn other_binaries_do_not_participate_in_sequencing() {
        let workspace = sample_workspace(
            "ws",
            vec![
                sample_app("editor", "C:\\C.exe", Rect::new(0, 0, 800, 600)),
                sample_app("browser", "C:\\B.exe", Rect::new(800, 0, 800, 600)),
            ],
        );
        let status = LaunchingStatus::new(&workspace);
        status.update(&workspace.apps[0], LaunchState::Launched);
        assert!(status.all_instances_launched_and_moved(&workspace.apps[1]));
    }

    #[test]
    fn update_with_window_binds_the_handle() {
        let workspace = two_instance_workspace();
        let status = LaunchingStatus::new(&workspace);
        let window = WindowHandle::new(7);

        status.update_with_window(&workspace.apps[0], window, LaunchState::LaunchedAndMoved);

        let snapshot = status.snapshot();
        assert_eq!(snapshot[0].window, Some(window));
        assert_eq!(snapshot[0].state, LaunchState::LaunchedAndMoved);
        assert_eq!(snapshot[1].window, None);
    }

    #[test]
    fn cancel_marks_only_non_terminal_entries() {
        let workspace = two_instance_workspace();
        let status = LaunchingStatus::new(&workspace);
        status.update(&workspace.apps[0], LaunchState::LaunchedAndMoved);

        status.cancel();

        assert_eq!(
            state_of(&status, &workspace.apps[0]),
            LaunchState::LaunchedAndMoved
        );
        assert_eq!(
            state_of(&status, &workspace.apps[1]),
            LaunchState::Canceled
        );
    }
}
