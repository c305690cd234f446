#![forbid(unsafe_code)]

//! Viewport-relative geometry primitives.
//!
//! All coordinates are `f64` pixels with the origin at the viewport's
//! top-left corner, y growing downward. Values are produced fresh on every
//! measurement pass and never mutated in place — a stale `Rect` is replaced,
//! not patched.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair. Used both for overlay sizes and viewport bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// The zero size. Resolving against it is the documented fallback when
    /// an overlay has not reported its real size yet.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero (or negative, which a
    /// well-behaved environment never reports).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle in viewport coordinates.
///
/// Carries both edge coordinates and the derived extent so callers never
/// recompute `right`/`bottom` from `left + width` at use sites. The two
/// constructors keep the redundancy consistent; there is no way to build a
/// `Rect` whose `width` disagrees with `right - left`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Build a rect from its top-left corner and a size.
    #[must_use]
    pub fn from_position(left: f64, top: f64, size: Size) -> Self {
        Self {
            top,
            left,
            right: left + size.width,
            bottom: top + size.height,
            width: size.width,
            height: size.height,
        }
    }

    /// Build a rect from its four edges.
    #[must_use]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
            width: right - left,
            height: bottom - top,
        }
    }

    /// The degenerate zero rect, reported for elements that are attached
    /// but occupy no space.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// The rect's size.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns true if the rect has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// The horizontal center of the rect.
    #[inline]
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Point-in-rect test. Edges are inclusive on the top/left and
    /// exclusive on the bottom/right, matching hit-testing conventions.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Returns true if the rect lies entirely within a viewport of the
    /// given size (edges inclusive).
    #[must_use]
    pub fn fits_within(&self, viewport: Size) -> bool {
        self.left >= 0.0
            && self.top >= 0.0
            && self.right <= viewport.width
            && self.bottom <= viewport.height
    }

    /// Translate the rect by a delta. Used by test environments to model
    /// scrolling; the engine itself never mutates measured rects.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::from_position(self.left + dx, self.top + dy, self.size())
    }
}
