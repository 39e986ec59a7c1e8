//! Installed-application inventory.
//!
//! The host maintains a list of installed applications (classic and
//! packaged); the service consumes it through [`AppInventory`] and wraps
//! it in [`CachedAppInventory`], whose TTL of one year makes the snapshot
//! effectively permanent within a process.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

/// Cache lifetime for the installed-apps snapshot.
pub const APPS_CACHE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// One installed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    pub name: String,
    #[serde(default)]
    pub path: PathBuf,
    #[serde(default)]
    pub app_user_model_id: String,
    #[serde(default)]
    pub package_full_name: String,
}

/// Errors surfaced while reading the inventory.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read application inventory from {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse application inventory: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of installed-application records.
pub trait AppInventory: Send + Sync {
    fn installed_apps(&self) -> Result<Vec<AppData>, InventoryError>;
}

/// An [`AppInventory`] backed by a JSON file (an array of [`AppData`]).
#[derive(Debug)]
pub struct FileAppInventory {
    path: PathBuf,
}

impl FileAppInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileAppInventory { path: path.into() }
    }
}

impl AppInventory for FileAppInventory {
    fn installed_apps(&self) -> Result<Vec<AppData>, InventoryError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            InventoryError::Read {
                path: self.path.clone(),
                source,
            }
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// A fixed in-memory inventory.
#[derive(Debug, Default)]
pub struct StaticAppInventory {
    apps: Vec<AppData>,
}

impl StaticAppInventory {
    pub fn new(apps: Vec<AppData>) -> Self {
        StaticAppInventory { apps }
    }
}

impl AppInventory for StaticAppInventory {
    fn installed_apps(&self) -> Result<Vec<AppData>, InventoryError> {
        Ok(self.apps.clone())
    }
}

/// Caching wrapper around an [`AppInventory`].
///
/// The first successful read is kept for [`APPS_CACHE_TTL`]; failures are
/// not cached.
pub struct CachedAppInventory {
    inner: Box<dyn AppInventory>,
    ttl: Duration,
    cache: Mutex<Option<(Instant, Arc<Vec<AppData>>)>>,
}

impl CachedAppInventory {
    pub fn new(inner: Box<dyn AppInventory>) -> Self {
        Self::with_ttl(inner, APPS_CACHE_TTL)
    }

    pub fn with_ttl(inner: Box<dyn AppInventory>, ttl: Duration) -> Self {
        CachedAppInventory {
            inner,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// The cached snapshot, refreshed from the underlying inventory when
    /// absent or expired.
    pub fn apps(&self) -> Result<Arc<Vec<AppData>>, InventoryError> {
        let mut cache = self.cache.lock().unwrap();
        if let Some((refreshed_at, apps)) = &*cache {
            if refreshed_at.elapsed() < self.ttl {
                return Ok(Arc::clone(apps));
            }
        }

        let apps = Arc::new(self.inner.installed_apps()?);
        info!(entries = apps.len(), "apps cache refreshed");
        *cache = Some((Instant::now(), Arc::clone(&apps)));
        Ok(apps)
    }
}
