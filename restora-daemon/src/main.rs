//! The Restora service binary.
//!
//! Loads the configuration, initializes logging, wires the facades into
//! the workspaces service, and serves the request channel until
//! interrupted. Each request is dispatched onto a blocking worker; the
//! engine itself is synchronous.

use anyhow::Context;
use restora_core::config::{ConfigLoader, WindowSystemBackend};
use restora_core::logging;
use restora_domain::{JsonWorkspaceStore, ReconcileError, WorkspacesService};
use restora_system::app_activation::NativeActivator;
use restora_system::app_inventory::{CachedAppInventory, FileAppInventory};
use restora_system::channel::{socket_path, RequestChannel};
use restora_system::pwa::TablePwaHelper;
use restora_system::window_system::{fake::FakeWindowSystem, WindowSystem};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load_or_default().context("failed to load configuration")?;
    logging::init_logging(&config.logging).context("failed to initialize logging")?;

    // A backend must be chosen explicitly; reconciling against a desktop
    // that is not there would make every request a silent no-op.
    let window_system: Arc<dyn WindowSystem> = match config.window_system.backend {
        Some(WindowSystemBackend::Headless) => {
            warn!("headless window-system backend selected; no real windows will be touched");
            Arc::new(FakeWindowSystem::new())
        }
        None => anyhow::bail!(
            "no window-system backend configured; set `backend = \"headless\"` in the \
             [window_system] section to run without a platform adapter"
        ),
    };

    let store = JsonWorkspaceStore::new(
        config.storage.workspaces_path()?,
        config.storage.temp_workspaces_path()?,
    );

    let inventory = config
        .storage
        .apps_file
        .as_ref()
        .map(|path| Arc::new(CachedAppInventory::new(Box::new(FileAppInventory::new(path)))));

    let service = Arc::new(WorkspacesService::new(
        Box::new(store),
        window_system,
        Arc::new(TablePwaHelper::new()),
        Arc::new(NativeActivator::new()),
        inventory,
    ));
    service.start();

    let path = socket_path(&config.channel.socket_name);
    let channel = RequestChannel::bind(&path)
        .with_context(|| format!("failed to bind request channel at {}", path.display()))?;
    info!(path = %path.display(), "listening for workspace requests");

    loop {
        tokio::select! {
            request = channel.recv() => {
                match request {
                    Ok(workspace_id) => {
                        let service = service.clone();
                        tokio::task::spawn_blocking(move || {
                            match service.submit(&workspace_id) {
                                Ok(_) => {}
                                Err(ReconcileError::AlreadyBusy) => {
                                    // Already logged by the intake.
                                }
                                Err(e) => error!(%workspace_id, error = %e, "workspace request failed"),
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "failed to read request"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }

    service.stop();
    Ok(())
}
