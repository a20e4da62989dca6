//! Axis-aligned rectangle geometry and collision tests
//!
//! Every physical entity carries a [`Rect`]; collision is strict overlap of
//! two rectangles; nothing fancier.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Check whether two rectangles overlap
///
/// Strict on both axes: rectangles that only share an edge do not collide,
/// while containment does.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Confine a horizontal position so `[x, x + width]` stays within `[0, boundary]`
#[inline]
pub fn clamp_to_bounds(x: f32, width: f32, boundary: f32) -> f32 {
    x.min(boundary - width).max(0.0)
}

/// True if the rectangle lies entirely outside the viewport on any side
pub fn is_out_of_viewport(rect: &Rect, viewport_width: f32, viewport_height: f32) -> bool {
    rect.right() <= 0.0
        || rect.x >= viewport_width
        || rect.bottom() <= 0.0
        || rect.y >= viewport_height
}
