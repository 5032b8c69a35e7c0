//! Viewport controller: auto-fit framing and pinch-zoom math.
//!
//! Auto-fit runs on structural changes (load, add, remove, room creation,
//! container resize), never per drag frame. Pinch-zoom runs per touch-move.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{
    FIT_EXISTING_MAX_SCALE, FIT_EXISTING_PADDING_PX, FIT_LEFT_GUTTER_PX, FIT_MIN_SCALE, FIT_NEW_ROOM_MAX_SCALE,
    FIT_NEW_ROOM_PADDING_PX, MIN_DIVISOR, PINCH_MAX_SCALE, PINCH_MIN_SCALE,
};
use crate::model::BoundingBox;
use crate::projection::{Point, Projection, Size, Viewport};

/// Horizontal placement of fitted content. Vertical placement is always centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    /// Center the content in the container.
    Center,
    /// Pin the content's left edge `gutter` pixels from the container's left.
    Left { gutter: f64 },
}

/// Auto-fit policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Pixels added to the content extent on each axis before fitting.
    pub padding: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub alignment: Alignment,
}

impl FitOptions {
    /// Framing for a loaded layout: shrink to fit but never zoom in.
    #[must_use]
    pub fn existing_layout() -> Self {
        Self {
            padding: FIT_EXISTING_PADDING_PX,
            min_scale: FIT_MIN_SCALE,
            max_scale: FIT_EXISTING_MAX_SCALE,
            alignment: Alignment::Left { gutter: FIT_LEFT_GUTTER_PX },
        }
    }

    /// Framing for a freshly created room: centered, may zoom in to 1.5×.
    #[must_use]
    pub fn new_room() -> Self {
        Self {
            padding: FIT_NEW_ROOM_PADDING_PX,
            min_scale: FIT_MIN_SCALE,
            max_scale: FIT_NEW_ROOM_MAX_SCALE,
            alignment: Alignment::Center,
        }
    }
}

/// Clamp without panicking on inverted bounds or NaN: NaN lands on `min`.
fn clamp_scale(scale: f64, min: f64, max: f64) -> f64 {
    scale.max(min).min(max)
}

/// Viewport that frames `bounds` (meters) inside `container` (pixels).
///
/// An empty layout gets the identity viewport. Zero extents and zero-sized
/// containers are clamped rather than divided by.
#[must_use]
pub fn fit(bounds: Option<BoundingBox>, pixels_per_meter: f64, container: Size, options: &FitOptions) -> Viewport {
    let Some(bounds) = bounds else {
        return Viewport::default();
    };

    let min_px = Point::new(bounds.min_x * pixels_per_meter, bounds.min_y * pixels_per_meter);
    let extent_w = (bounds.width() * pixels_per_meter).max(0.0);
    let extent_h = (bounds.height() * pixels_per_meter).max(0.0);

    let content_w = (extent_w + options.padding).max(MIN_DIVISOR);
    let content_h = (extent_h + options.padding).max(MIN_DIVISOR);
    let container_w = container.width.max(0.0);
    let container_h = container.height.max(0.0);

    let scale = clamp_scale(
        (container_w / content_w).min(container_h / content_h),
        options.min_scale,
        options.max_scale,
    );

    let y = (container_h - extent_h * scale) / 2.0 - min_px.y * scale;
    let x = match options.alignment {
        Alignment::Center => (container_w - extent_w * scale) / 2.0 - min_px.x * scale,
        Alignment::Left { gutter } => gutter - min_px.x * scale,
    };

    Viewport { scale, offset: Point::new(x, y) }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchFrame {
    distance: f64,
    center: Point,
}

/// Two-finger zoom tracker.
///
/// The previous frame's finger distance and midpoint are kept between moves
/// and dropped as soon as fewer than two fingers remain, however the gesture
/// ended, so the next pinch never starts from a stale reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchZoom {
    min_scale: f64,
    max_scale: f64,
    last: Option<PinchFrame>,
}

impl Default for PinchZoom {
    fn default() -> Self {
        Self::new(PINCH_MIN_SCALE, PINCH_MAX_SCALE)
    }
}

impl PinchZoom {
    #[must_use]
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        Self { min_scale, max_scale, last: None }
    }

    /// Whether a reference frame is being tracked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Feed the current touch points. Returns the new viewport once two
    /// consecutive two-finger frames have been seen.
    ///
    /// The metric point under the previous midpoint ends up under the current
    /// midpoint, so a pinch that also drifts pans with the fingers.
    pub fn on_touch_move(&mut self, touches: &[Point], projection: &Projection) -> Option<Viewport> {
        let [p1, p2, ..] = touches else {
            self.reset();
            return None;
        };
        let frame = PinchFrame { distance: p1.distance_to(*p2), center: p1.midpoint(*p2) };
        let prev = self.last.replace(frame)?;
        if prev.distance < MIN_DIVISOR || !frame.distance.is_finite() {
            return None;
        }

        let factor = frame.distance / prev.distance;
        let scale = clamp_scale(projection.viewport.scale * factor, self.min_scale, self.max_scale);
        let anchor = projection.to_metric(prev.center);
        let density = projection.pixels_per_meter * scale;
        let offset = Point::new(frame.center.x - anchor.x * density, frame.center.y - anchor.y * density);
        Some(Viewport { scale, offset })
    }

    /// Touch-end or touch-cancel with `remaining` fingers still down.
    pub fn on_touch_end(&mut self, remaining: usize) {
        if remaining < 2 {
            self.reset();
        }
    }
}
