//! Core infrastructure for the Restora workspace restorer.
//!
//! This crate holds everything the higher layers share: the geometric and
//! window-related value types, the error hierarchy, configuration loading,
//! and logging initialization. It has no knowledge of the reconciliation
//! pipeline itself.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

pub use config::{
    ChannelConfig, ConfigLoader, CoreConfig, LoggingConfig, StorageConfig, WindowSystemBackend,
    WindowSystemConfig,
};
pub use error::{ConfigError, CoreError, LoggingError};
pub use types::geometry::Rect;
pub use types::monitor::Monitor;
pub use types::window::{ShowState, WindowHandle};
