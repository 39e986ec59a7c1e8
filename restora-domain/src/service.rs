//! Request intake.
//!
//! [`WorkspacesService`] is the process-scoped entry point: it owns the
//! workspace store and the reconciler, enforces single-flight admission,
//! and has an explicit start/stop lifecycle. The request channel lives
//! outside; whoever runs it calls [`WorkspacesService::submit`] with the
//! decoded workspace id.

use crate::reconcile::{ReconcileSummary, WorkspaceReconciler};
use crate::workspaces::{WorkspaceStore, WorkspaceStoreError};
use restora_system::app_activation::AppActivator;
use restora_system::app_inventory::CachedAppInventory;
use restora_system::pwa::PwaHelper;
use restora_system::window_system::WindowSystem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors surfaced by [`WorkspacesService::submit`].
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The requested workspace id is unknown to every store.
    #[error("workspace '{0}' was not found")]
    WorkspaceNotFound(String),

    /// Another request currently owns the pipeline.
    #[error("another workspace request is already in progress")]
    AlreadyBusy,

    /// The service has not been started, or has been stopped.
    #[error("the workspaces service is not running")]
    NotRunning,

    /// The workspace store failed.
    #[error(transparent)]
    Store(#[from] WorkspaceStoreError),
}

/// Releases the single-flight latch on every exit path.
struct SingleFlightGuard<'a> {
    latch: &'a AtomicBool,
}

impl<'a> SingleFlightGuard<'a> {
    fn acquire(latch: &'a AtomicBool) -> Option<Self> {
        latch
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SingleFlightGuard { latch })
    }
}

impl Drop for SingleFlightGuard<'_> {
    fn drop(&mut self) {
        self.latch.store(false, Ordering::Release);
    }
}

/// The workspace restoration service.
pub struct WorkspacesService {
    store: Box<dyn WorkspaceStore>,
    reconciler: WorkspaceReconciler,
    inventory: Option<Arc<CachedAppInventory>>,
    running: AtomicBool,
    processing: AtomicBool,
}

impl WorkspacesService {
    pub fn new(
        store: Box<dyn WorkspaceStore>,
        window_system: Arc<dyn WindowSystem>,
        pwa: Arc<dyn PwaHelper>,
        activator: Arc<dyn AppActivator>,
        inventory: Option<Arc<CachedAppInventory>>,
    ) -> Self {
        WorkspacesService {
            store,
            reconciler: WorkspaceReconciler::new(window_system, pwa, activator),
            inventory,
            running: AtomicBool::new(false),
            processing: AtomicBool::new(false),
        }
    }

    /// Starts the service and pre-warms the installed-apps cache.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::AcqRel) {
            warn!("workspaces service already started");
            return;
        }
        info!("starting workspaces service");

        if let Some(inventory) = &self.inventory {
            let warm_start = Instant::now();
            match inventory.apps() {
                Ok(apps) => info!(
                    entries = apps.len(),
                    elapsed_ms = warm_start.elapsed().as_millis() as u64,
                    "apps cache pre-loaded"
                ),
                Err(e) => warn!(error = %e, "failed to pre-load apps cache"),
            }
        }

        info!("workspaces service started");
    }

    /// Stops the service; subsequent submissions are rejected. A request
    /// already in flight is not interrupted.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        info!("workspaces service stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Restores the workspace named by `workspace_id`.
    ///
    /// Runs the whole pipeline on the calling thread. At most one request
    /// is admitted at a time; overlapping submissions fail fast with
    /// [`ReconcileError::AlreadyBusy`] and touch no state.
    pub fn submit(&self, workspace_id: &str) -> Result<ReconcileSummary, ReconcileError> {
        if !self.is_running() {
            warn!(%workspace_id, "request rejected: service not running");
            return Err(ReconcileError::NotRunning);
        }

        let Some(_guard) = SingleFlightGuard::acquire(&self.processing) else {
            warn!(%workspace_id, "already processing a workspace request, ignoring");
            return Err(ReconcileError::AlreadyBusy);
        };

        let started = Instant::now();
        info!(%workspace_id, "processing workspace request");

        let workspace = match self.store.load(workspace_id)? {
            Some(workspace) => workspace,
            None => {
                error!(%workspace_id, "failed to load workspace");
                return Err(ReconcileError::WorkspaceNotFound(workspace_id.to_string()));
            }
        };

        if workspace.apps.is_empty() {
            info!(workspace = %workspace.name, "workspace is empty, nothing to restore");
            return Ok(ReconcileSummary::default());
        }

        let summary = self.reconciler.run(&workspace);
        info!(
            workspace = %workspace.name,
            moved = summary.moved_windows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "workspace request completed"
        );
        Ok(summary)
    }
}
