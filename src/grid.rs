//! Grid snapping in meters.
//!
//! Snapping happens only when a gesture ends (and for default placement), never
//! on every drag frame.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use crate::consts::DEFAULT_GRID_QUANTUM;
use crate::projection::{Point, Size};

/// Rounds metric values to the nearest multiple of a grid quantum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSnapper {
    quantum: f64,
}

impl Default for GridSnapper {
    fn default() -> Self {
        Self { quantum: DEFAULT_GRID_QUANTUM }
    }
}

impl GridSnapper {
    /// A snapper with the given quantum. Non-positive or non-finite quanta
    /// fall back to the default 0.25 m.
    #[must_use]
    pub fn new(quantum: f64) -> Self {
        if quantum.is_finite() && quantum > 0.0 {
            Self { quantum }
        } else {
            Self::default()
        }
    }

    #[must_use]
    pub fn quantum(&self) -> f64 {
        self.quantum
    }

    /// Nearest multiple of the quantum. Non-finite input snaps to 0.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        (value / self.quantum).round() * self.quantum
    }

    /// Like [`GridSnapper::snap`] but never below one quantum.
    #[must_use]
    pub fn snap_dimension(&self, value: f64) -> f64 {
        self.snap(value).max(self.quantum)
    }

    #[must_use]
    pub fn snap_point(&self, p: Point) -> Point {
        Point::new(self.snap(p.x), self.snap(p.y))
    }

    #[must_use]
    pub fn snap_size(&self, size: Size) -> Size {
        Size::new(self.snap_dimension(size.width), self.snap_dimension(size.height))
    }
}
