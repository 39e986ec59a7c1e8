//! Workspace loading.
//!
//! Workspace records are read-only inputs owned by the editing tools; the
//! engine consumes them through [`WorkspaceStore`]. The JSON store reads
//! two sources in order: the main store (an array of workspaces) and a
//! single-entry temporary store holding an unsaved workspace. The first
//! source containing the requested id wins.

use super::types::Workspace;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced while reading a workspace store.
#[derive(Debug, Error)]
pub enum WorkspaceStoreError {
    #[error("failed to read workspace store {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse workspace store {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of workspace definitions.
///
/// `load` must be pure with respect to a single call: the same id queried
/// twice against unchanged stores yields the same workspace.
pub trait WorkspaceStore: Send + Sync {
    fn load(&self, workspace_id: &str) -> Result<Option<Workspace>, WorkspaceStoreError>;
}

/// [`WorkspaceStore`] over the JSON files written by the workspace editor.
#[derive(Debug)]
pub struct JsonWorkspaceStore {
    workspaces_file: PathBuf,
    temp_workspace_file: PathBuf,
}

impl JsonWorkspaceStore {
    pub fn new(
        workspaces_file: impl Into<PathBuf>,
        temp_workspace_file: impl Into<PathBuf>,
    ) -> Self {
        JsonWorkspaceStore {
            workspaces_file: workspaces_file.into(),
            temp_workspace_file: temp_workspace_file.into(),
        }
    }

    fn read_main(&self) -> Result<Vec<Workspace>, WorkspaceStoreError> {
        read_json(&self.workspaces_file)
    }

    fn read_temp(&self) -> Result<Workspace, WorkspaceStoreError> {
        read_json(&self.temp_workspace_file)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, WorkspaceStoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| WorkspaceStoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| WorkspaceStoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl WorkspaceStore for JsonWorkspaceStore {
    /// Store-level failures do not abort the lookup: a missing or damaged
    /// main store is logged and the temporary store is still consulted.
    fn load(&self, workspace_id: &str) -> Result<Option<Workspace>, WorkspaceStoreError> {
        match self.read_main() {
            Ok(workspaces) => {
                if let Some(workspace) = workspaces.into_iter().find(|w| w.id == workspace_id) {
                    debug!(id = %workspace_id, name = %workspace.name, "workspace found in main store");
                    return Ok(Some(workspace));
                }
            }
            Err(WorkspaceStoreError::Read { ref source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!(path = ?self.workspaces_file, "main workspace store absent");
            }
            Err(e) => warn!(error = %e, "failed to read main workspace store"),
        }

        match self.read_temp() {
            Ok(workspace) if workspace.id == workspace_id => {
                debug!(id = %workspace_id, name = %workspace.name, "workspace found in temp store");
                Ok(Some(workspace))
            }
            Ok(_) => Ok(None),
            Err(WorkspaceStoreError::Read { ref source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "failed to read temp workspace store");
                Ok(None)
            }
        }
    }
}
