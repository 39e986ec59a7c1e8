//! Window handle and show-state types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque reference to a top-level window owned by the window system.
///
/// Handles compare by value and are never closed or otherwise owned by this
/// process; they are only meaningful for the lifetime of the window they
/// refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(u64);

impl WindowHandle {
    /// Wraps a raw window-system token.
    pub const fn new(raw: u64) -> Self {
        WindowHandle(raw)
    }

    /// The underlying raw token.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// The observed presentation state of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowState {
    Normal,
    Minimized,
    Maximized,
}

impl ShowState {
    /// Whether the window is currently minimized.
    pub fn is_minimized(&self) -> bool {
        matches!(self, ShowState::Minimized)
    }
}
