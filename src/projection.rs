//! Unit projection between the metric model and screen pixels.
//!
//! Two independent factors drive the projection: `pixels_per_meter`, a
//! session-wide density chosen at startup (or by room creation), and the
//! [`Viewport`] scale, which changes continuously under zoom gestures. They
//! multiply together but are never merged into one number, so snapping in
//! meters stays exact after any amount of pinch-zooming.

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_DIVISOR;

/// A point in either metric (meters) or pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Width and height in either metric or pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides finite and strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width and height exchanged.
    #[must_use]
    pub fn swapped(self) -> Size {
        Size::new(self.height, self.width)
    }
}

/// Pan/zoom state. Ephemeral: recomputed every session, never persisted.
///
/// `offset` is in pixels. `scale` multiplies `pixels_per_meter` (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, offset: Point::default() }
    }
}

/// Conversion between metric and pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub pixels_per_meter: f64,
    pub viewport: Viewport,
}

impl Projection {
    #[must_use]
    pub fn new(pixels_per_meter: f64, viewport: Viewport) -> Self {
        Self { pixels_per_meter, viewport }
    }

    /// Effective pixels per meter after zoom, never zero.
    #[must_use]
    pub fn effective_density(&self) -> f64 {
        let density = self.pixels_per_meter * self.viewport.scale;
        if !density.is_finite() || density.abs() < MIN_DIVISOR {
            return MIN_DIVISOR;
        }
        density
    }

    /// Project a metric point to pixels.
    #[must_use]
    pub fn to_pixels(&self, metric: Point) -> Point {
        let k = self.effective_density();
        Point {
            x: metric.x * k + self.viewport.offset.x,
            y: metric.y * k + self.viewport.offset.y,
        }
    }

    /// Inverse of [`Projection::to_pixels`].
    #[must_use]
    pub fn to_metric(&self, pixel: Point) -> Point {
        let k = self.effective_density();
        Point {
            x: (pixel.x - self.viewport.offset.x) / k,
            y: (pixel.y - self.viewport.offset.y) / k,
        }
    }

    /// Convert a metric length to pixels (no offset applied).
    #[must_use]
    pub fn length_to_pixels(&self, meters: f64) -> f64 {
        meters * self.effective_density()
    }

    /// Convert a pixel length to meters (no offset applied).
    #[must_use]
    pub fn length_to_metric(&self, pixels: f64) -> f64 {
        pixels / self.effective_density()
    }

    #[must_use]
    pub fn size_to_pixels(&self, size: Size) -> Size {
        Size::new(self.length_to_pixels(size.width), self.length_to_pixels(size.height))
    }
}

/// Pick a starting density from the container width.
///
/// Counts how many `cell_pixels` cells fit across: 40 or more gives 4 cells
/// per meter, 20 or more gives 2, anything narrower gives 1.
#[must_use]
pub fn initial_pixels_per_meter(container_width: f64, cell_pixels: f64) -> f64 {
    if !container_width.is_finite() || cell_pixels <= 0.0 {
        return 4.0 * cell_pixels.max(MIN_DIVISOR);
    }
    let available_cells = (container_width / cell_pixels).floor();
    let cells_per_meter = if available_cells >= 40.0 {
        4.0
    } else if available_cells >= 20.0 {
        2.0
    } else {
        1.0
    };
    cells_per_meter * cell_pixels
}
