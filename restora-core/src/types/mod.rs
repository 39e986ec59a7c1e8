//! Shared value types used across the Restora crates.

pub mod geometry;
pub mod monitor;
pub mod window;

pub use geometry::Rect;
pub use monitor::Monitor;
pub use window::{ShowState, WindowHandle};
