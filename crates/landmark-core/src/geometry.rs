//! Points and element footprints.
//!
//! A [`Point`] is used in both pixel space (the unscaled photo) and screen
//! space (the rendered viewport). The space is never stored on the value;
//! callers keep track of which one they are holding.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A 2D point or offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downward.
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiply both coordinates by `factor`.
    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// True if both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Width and height of a rendered element, in screen pixels.
///
/// Markers are anchored at their geometric center, but the render sink
/// positions elements by their top-left corner. The footprint converts
/// between the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Marker width in screen pixels.
    pub width: f64,
    /// Marker height in screen pixels.
    pub height: f64,
}

impl Default for Footprint {
    fn default() -> Self {
        Self::new(20.0, 20.0)
    }
}

impl Footprint {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn half_extent(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Top-left corner for an element whose center sits on `anchor`.
    #[inline]
    pub fn center_on(self, anchor: Point) -> Point {
        anchor - self.half_extent()
    }

    /// Center of an element whose top-left corner sits on `corner`.
    #[inline]
    pub fn anchor_of(self, corner: Point) -> Point {
        corner + self.half_extent()
    }
}
