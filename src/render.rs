//! Pixel-space scene description for the host renderer.
//!
//! Nothing here is stored: every call rebuilds pixel geometry from the
//! metric plan and the current projection.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::{GRID_LINE_BUFFER_CELLS, MAX_GRID_LINES};
use crate::model::{BoundingBox, Element, ElementId, ElementKind, Plan, Rotation};
use crate::projection::{Point, Projection, Size};

/// One element ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Node origin (rotation pivot) in pixels.
    pub origin: Point,
    pub size: Size,
    pub rotation: Rotation,
    pub label: Option<String>,
    pub font_px: Option<f64>,
}

/// Project one element.
#[must_use]
pub fn render_node(element: &Element, projection: &Projection) -> RenderNode {
    RenderNode {
        id: element.id.clone(),
        kind: element.kind,
        origin: projection.to_pixels(element.position),
        size: projection.size_to_pixels(element.size_or_zero()),
        rotation: element.rotation,
        label: element.label.clone(),
        font_px: element.font_size.map(|f| projection.length_to_pixels(f)),
    }
}

/// Every element in draw order.
#[must_use]
pub fn scene(plan: &Plan, projection: &Projection) -> Vec<RenderNode> {
    plan.elements().iter().map(|e| render_node(e, projection)).collect()
}

/// Metric rect visible in a `container` of the given pixel size.
#[must_use]
pub fn visible_rect(projection: &Projection, container: Size) -> BoundingBox {
    let top_left = projection.to_metric(Point::new(0.0, 0.0));
    let bottom_right = projection.to_metric(Point::new(container.width, container.height));
    BoundingBox { min_x: top_left.x, min_y: top_left.y, max_x: bottom_right.x, max_y: bottom_right.y }
}

/// Grid line positions in meters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLines {
    /// X coordinates of vertical lines.
    pub vertical: Vec<f64>,
    /// Y coordinates of horizontal lines.
    pub horizontal: Vec<f64>,
}

/// Grid lines covering `visible` plus a few cells of buffer on every side.
///
/// Returns no lines when `cell` is not positive or the grid would be
/// unreasonably dense.
#[must_use]
pub fn grid_lines(visible: BoundingBox, cell: f64) -> GridLines {
    if !(cell.is_finite() && cell > 0.0) {
        return GridLines::default();
    }
    let buffer = cell * GRID_LINE_BUFFER_CELLS;
    let axis = |lo: f64, hi: f64| -> Vec<f64> {
        let start = (lo / cell).floor() * cell - buffer;
        let end = (hi / cell).ceil() * cell + buffer;
        let span = ((end - start) / cell).round();
        if !span.is_finite() || span < 0.0 || span >= MAX_GRID_LINES as f64 {
            return Vec::new();
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = span as usize + 1;
        #[allow(clippy::cast_precision_loss)]
        let lines = (0..count).map(|i| start + i as f64 * cell).collect();
        lines
    };
    GridLines {
        vertical: axis(visible.min_x, visible.max_x),
        horizontal: axis(visible.min_y, visible.max_y),
    }
}
