//! Workspace records and the stores they are loaded from.

pub mod store;
pub mod types;

pub use store::{JsonWorkspaceStore, WorkspaceStore, WorkspaceStoreError};
pub use types::{Application, WindowState, Workspace};
