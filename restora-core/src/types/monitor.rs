//! Monitor geometry.

use crate::types::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A physical monitor as reported by the window system.
///
/// `bounds` is the full monitor rectangle in virtual-screen coordinates;
/// `work_area` is the portion left over after reserved desktop chrome
/// (taskbars, docks) is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub bounds: Rect,
    pub work_area: Rect,
    pub is_primary: bool,
}

impl Monitor {
    /// Offset of the work area's top-left corner relative to the full
    /// monitor bounds, as `(dx, dy)`.
    ///
    /// Saved placements are expressed in screen coordinates; subtracting
    /// this offset converts them to work-area coordinates.
    pub fn work_area_offset(&self) -> (i32, i32) {
        (
            self.work_area.x - self.bounds.x,
            self.work_area.y - self.bounds.y,
        )
    }
}
