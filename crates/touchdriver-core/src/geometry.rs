//! Screen-space rectangles.
//!
//! Coordinates are integer pixels with the origin at the top-left corner of
//! the screen, matching what the element-tree provider reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its four edges.
///
/// `right` and `bottom` are exclusive. A rectangle reported as the visible
/// bounds of a visible element always has `right >= left` and
/// `bottom >= top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Horizontal center, rounded toward the left edge.
    pub const fn center_x(&self) -> i32 {
        (self.left + self.right) >> 1
    }

    /// Vertical center, rounded toward the top edge.
    pub const fn center_y(&self) -> i32 {
        (self.top + self.bottom) >> 1
    }

    /// Returns true if the rectangle has zero or negative area.
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Returns true if `(x, y)` lies inside the rectangle.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Compact `[left,top][right,bottom]` form used in element dumps.
    pub fn short_string(&self) -> String {
        format!("[{},{}][{},{}]", self.left, self.top, self.right, self.bottom)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_string())
    }
}
