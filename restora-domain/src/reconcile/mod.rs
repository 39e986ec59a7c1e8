//! The four-phase reconciliation pipeline.
//!
//! One request runs the phases strictly in order, on the request thread:
//!
//! 1. minimize every window that belongs neither to the workspace nor to
//!    the protected system chrome,
//! 2. move already-running windows that match workspace applications,
//! 3. launch whatever is still missing, one application at a time,
//! 4. poll for the windows the launches produce and place them.
//!
//! Failures stay scoped to the application they belong to; the request
//! always runs to completion.

use crate::launching::{
    AppLaunchEngine, LaunchError, LaunchState, LaunchingAppState, LaunchingStatus,
};
use crate::matching::{nearest_window, WindowMatcher};
use crate::placement::WindowPlacer;
use crate::workspaces::Workspace;
use restora_core::types::{Monitor, WindowHandle};
use restora_system::app_activation::AppActivator;
use restora_system::pwa::PwaHelper;
use restora_system::window_system::WindowSystem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Upper bound on the wait for earlier instances of the same application.
const LAUNCH_WAIT_TIMEOUT: Duration = Duration::from_millis(2000);
/// Poll interval for the launch-sequencing wait.
const LAUNCH_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Extra settle delay after any sequencing wait; some applications
/// misbehave when instances start in rapid succession.
const LAUNCH_SETTLE_DELAY: Duration = Duration::from_millis(500);
/// Total budget for finding and placing newly created windows.
const PLACEMENT_TIMEOUT: Duration = Duration::from_millis(5000);
/// Poll interval for the placement scan.
const PLACEMENT_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Worker cap for the minimization sweep.
const MAX_MINIMIZE_WORKERS: usize = 4;

/// What a reconciliation run did.
#[derive(Debug, Clone, Default)]
pub struct ReconcileSummary {
    /// Windows placed by this request, in placement order.
    pub moved_windows: Vec<WindowHandle>,
    /// Launch failures accumulated across all applications.
    pub launch_errors: Vec<LaunchError>,
    /// Final per-application states, in workspace order. Every state is
    /// terminal: applications the request could not finish are canceled
    /// before it returns.
    pub app_states: Vec<LaunchingAppState>,
}

/// Runs the reconciliation pipeline for one workspace at a time.
pub struct WorkspaceReconciler {
    window_system: Arc<dyn WindowSystem>,
    matcher: WindowMatcher,
    placer: WindowPlacer,
    launch_engine: AppLaunchEngine,
}

impl WorkspaceReconciler {
    pub fn new(
        window_system: Arc<dyn WindowSystem>,
        pwa: Arc<dyn PwaHelper>,
        activator: Arc<dyn AppActivator>,
    ) -> Self {
        WorkspaceReconciler {
            matcher: WindowMatcher::new(window_system.clone(), pwa),
            placer: WindowPlacer::new(window_system.clone()),
            launch_engine: AppLaunchEngine::new(activator),
            window_system,
        }
    }

    /// Reconciles the desktop with `workspace`.
    ///
    /// All per-request state (the status tracker, the moved-window set,
    /// the error list, and the window and monitor snapshots) lives inside
    /// this call.
    pub fn run(&self, workspace: &Workspace) -> ReconcileSummary {
        let started = Instant::now();
        info!(workspace = %workspace.name, apps = workspace.apps.len(), "reconciling workspace");

        let status = LaunchingStatus::new(workspace);
        let windows_before = self.window_system.enumerate_windows();

        if workspace.apps.is_empty() {
            info!(workspace = %workspace.name, "workspace has no applications, nothing to reconcile");
            return ReconcileSummary::default();
        }

        let monitors = self.window_system.monitors();
        let launch_errors: Mutex<Vec<LaunchError>> = Mutex::new(Vec::new());
        let mut moved: Vec<WindowHandle> = Vec::new();

        let phase_start = Instant::now();
        self.minimize_unmanaged(&status, &windows_before, &moved);
        info!(elapsed_ms = phase_start.elapsed().as_millis() as u64, "phase 1 (minimize) complete");

        if workspace.move_existing_windows {
            let phase_start = Instant::now();
            self.move_existing(&status, &mut moved, &monitors);
            info!(
                moved = moved.len(),
                elapsed_ms = phase_start.elapsed().as_millis() as u64,
                "phase 2 (move existing) complete"
            );
        } else {
            info!("phase 2 skipped: workspace keeps existing windows in place");
        }

        let phase_start = Instant::now();
        self.launch_missing(&status, &moved, &launch_errors);
        info!(elapsed_ms = phase_start.elapsed().as_millis() as u64, "phase 3 (launch) complete");

        let phase_start = Instant::now();
        self.place_new(&status, &mut moved, &monitors);
        info!(elapsed_ms = phase_start.elapsed().as_millis() as u64, "phase 4 (place new) complete");

        // The request is over; whatever is still in flight stays that way
        // only on paper. Cancel it so the final accounting is all
        // terminal states.
        let pending = status
            .snapshot()
            .iter()
            .filter(|e| !e.state.is_terminal())
            .count();
        if pending > 0 {
            status.cancel();
            warn!(pending, "placement budget exhausted with applications still pending, canceled");
        }

        let launch_errors = launch_errors.into_inner().unwrap();
        if !launch_errors.is_empty() {
            warn!(errors = launch_errors.len(), "launch errors occurred");
            for launch_error in &launch_errors {
                error!(app = %launch_error.app, message = %launch_error.message, "launch error");
            }
        }

        info!(
            workspace = %workspace.name,
            moved = moved.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "workspace reconciliation complete"
        );

        ReconcileSummary {
            moved_windows: moved,
            launch_errors,
            app_states: status.snapshot(),
        }
    }

    /// Phase 1: minimize everything that is not protected.
    ///
    /// A window is protected when it has already been moved by this
    /// request, is a system popup, or matches any workspace application.
    /// Filtering runs sequentially on the request thread; only the
    /// minimize calls themselves fan out, over disjoint chunks, so no
    /// worker touches shared mutable state.
    fn minimize_unmanaged(
        &self,
        status: &LaunchingStatus,
        windows: &[WindowHandle],
        moved: &[WindowHandle],
    ) {
        let workspace = status.workspace();
        let mut unmanaged: Vec<WindowHandle> = Vec::new();
        let mut protected = 0usize;

        for &window in windows {
            if moved.contains(&window) {
                continue;
            }
            if self.window_system.is_system_popup(window) {
                continue;
            }
            if workspace
                .apps
                .iter()
                .any(|app| self.matcher.matches(window, app))
            {
                protected += 1;
                continue;
            }
            unmanaged.push(window);
        }

        info!(
            unmanaged = unmanaged.len(),
            protected, "minimizing unmanaged windows"
        );
        if unmanaged.is_empty() {
            return;
        }

        let workers = unmanaged.len().min(MAX_MINIMIZE_WORKERS);
        let chunk_size = unmanaged.len().div_ceil(workers);
        let minimized = AtomicUsize::new(0);
        let window_system = self.window_system.as_ref();

        std::thread::scope(|scope| {
            for chunk in unmanaged.chunks(chunk_size) {
                let minimized = &minimized;
                scope.spawn(move || {
                    let mut local = 0usize;
                    for &window in chunk {
                        match window_system.force_minimize(window) {
                            Ok(()) => local += 1,
                            Err(e) => warn!(%window, error = %e, "failed to minimize window"),
                        }
                    }
                    minimized.fetch_add(local, Ordering::Relaxed);
                });
            }
        });

        info!(
            minimized = minimized.load(Ordering::Relaxed),
            protected, "minimization finished"
        );
    }

    /// Phase 2: reposition windows that are already running.
    ///
    /// Applications are visited in workspace order; each consumes at most
    /// the first enumeration-order window that matches it and has not
    /// been moved yet.
    fn move_existing(
        &self,
        status: &LaunchingStatus,
        moved: &mut Vec<WindowHandle>,
        monitors: &[Monitor],
    ) {
        let current = self.window_system.enumerate_windows();
        info!(windows = current.len(), "checking current windows for existing matches");

        for app in &status.workspace().apps {
            for &window in &current {
                if moved.contains(&window) {
                    continue;
                }
                if !self.matcher.matches(window, app) {
                    continue;
                }

                info!(app = %app.name, %window, "found existing window");
                match self.placer.place(window, app, monitors) {
                    Ok(()) => {
                        moved.push(window);
                        status.update_with_window(app, window, LaunchState::LaunchedAndMoved);
                        info!(app = %app.name, "existing window moved");
                    }
                    Err(e) => {
                        warn!(app = %app.name, %window, error = %e, "failed to move existing window");
                    }
                }
                break;
            }
        }
    }

    /// Phase 3: launch applications that have no window yet, one at a
    /// time.
    ///
    /// Before launching, a second instance of an already-started binary
    /// holds until the earlier instances have been placed (or the wait
    /// budget runs out), then settles briefly.
    fn launch_missing(
        &self,
        status: &LaunchingStatus,
        moved: &[WindowHandle],
        launch_errors: &Mutex<Vec<LaunchError>>,
    ) {
        while let Some(entry) = status.next(LaunchState::Waiting) {
            let app = entry.application;

            if let Some(&window) = moved
                .iter()
                .find(|&&window| self.matcher.matches(window, &app))
            {
                status.update_with_window(&app, window, LaunchState::LaunchedAndMoved);
                info!(app = %app.name, %window, "application already has a moved window");
                continue;
            }

            let mut waited = Duration::ZERO;
            let mut any_wait = false;
            while !status.all_instances_launched_and_moved(&app) && waited < LAUNCH_WAIT_TIMEOUT {
                std::thread::sleep(LAUNCH_POLL_INTERVAL);
                waited += LAUNCH_POLL_INTERVAL;
                any_wait = true;
            }
            if any_wait {
                std::thread::sleep(LAUNCH_SETTLE_DELAY);
            }
            if waited >= LAUNCH_WAIT_TIMEOUT {
                info!(app = %app.name, "wait for earlier instances expired");
            }

            let launched = {
                let mut errors = launch_errors.lock().unwrap();
                self.launch_engine.launch(&app, &mut errors)
            };

            if launched {
                status.update(&app, LaunchState::Launched);
                info!(app = %app.name, "application launched");
            } else {
                status.update(&app, LaunchState::Failed);
                error!(app = %app.name, "failed to launch application");
            }
        }
    }

    /// Phase 4: place the windows produced by phase 3.
    ///
    /// Scans for the nearest unclaimed matching window of every launched
    /// application until everything is placed or the budget runs out.
    fn place_new(
        &self,
        status: &LaunchingStatus,
        moved: &mut Vec<WindowHandle>,
        monitors: &[Monitor],
    ) {
        let start = Instant::now();

        loop {
            if start.elapsed() > PLACEMENT_TIMEOUT {
                info!("window search timeout reached");
                break;
            }
            if status.all_launched_and_moved() {
                info!("all applications launched and moved");
                break;
            }

            let mut placed_any = false;
            for entry in status.snapshot() {
                if entry.state != LaunchState::Launched {
                    continue;
                }
                let app = entry.application;

                let Some(found) =
                    nearest_window(self.window_system.as_ref(), &self.matcher, &app, moved)
                else {
                    continue;
                };

                info!(
                    app = %app.name,
                    window = %found.window,
                    distance = found.distance,
                    "found new window"
                );
                match self.placer.place(found.window, &app, monitors) {
                    Ok(()) => {
                        moved.push(found.window);
                        status.update_with_window(&app, found.window, LaunchState::LaunchedAndMoved);
                        placed_any = true;
                        info!(app = %app.name, "new window moved");
                    }
                    Err(e) => {
                        warn!(app = %app.name, window = %found.window, error = %e, "failed to move new window");
                        status.update_with_window(&app, found.window, LaunchState::Failed);
                    }
                }
            }

            if !placed_any {
                std::thread::sleep(PLACEMENT_POLL_INTERVAL);
            }
        }
    }
}
