//! Transform interaction controller: drag, resize, and rotate endings.
//!
//! DESIGN
//! ======
//! Each operation reads the element from the plan, computes the corrected
//! metric geometry, writes it back, and returns a [`TransformOutcome`] that
//! carries both the applied patch and the exact pixel values the host must
//! write onto its live node. Writing those back immediately keeps the
//! rendered node from showing the unsnapped position for a frame.
//!
//! Drags and resizes snap the element's visual top-left corner (the corner of
//! its rotated footprint), not the pivot, so rotated elements line up with
//! the grid the same way unrotated ones do.
//!
//! An operation on an id that is no longer in the plan returns `None`.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use tracing::debug;

use crate::door::DoorSolver;
use crate::grid::GridSnapper;
use crate::input::{GestureResult, ScaleFactors};
use crate::model::{
    BoundingBox, ElementId, ElementKind, ElementPatch, Plan, Rotation, position_for_center,
    position_for_visual_origin, visual_origin, visual_size,
};
use crate::projection::{Point, Projection, Size};

/// What happens to the grid after a 90° rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationSnap {
    /// Keep the footprint's center exactly where it was.
    #[default]
    PreserveCenter,
    /// Snap the rotated footprint's top-left to the grid. The center can move
    /// by up to half a quantum when width and height differ by an odd number
    /// of quanta.
    GridCorner,
}

/// Result of a completed transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutcome {
    pub id: ElementId,
    /// Fields written to the plan.
    pub patch: ElementPatch,
    /// Node origin to write back to the renderer, in pixels.
    pub node_position: Point,
    /// Node scale to write back; always identity after a transform.
    pub node_scale: ScaleFactors,
}

/// Applies gesture endings to the plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformController {
    snapper: GridSnapper,
    doors: DoorSolver,
    rotation_snap: RotationSnap,
}

impl TransformController {
    #[must_use]
    pub fn new(snapper: GridSnapper, doors: DoorSolver, rotation_snap: RotationSnap) -> Self {
        Self { snapper, doors, rotation_snap }
    }

    #[must_use]
    pub fn snapper(&self) -> &GridSnapper {
        &self.snapper
    }

    /// Finish a drag. Doors glue to the nearest room wall; everything else,
    /// including doors in a plan without a room, snaps to the grid.
    pub fn drag_end(
        &self,
        plan: &mut Plan,
        projection: &Projection,
        id: &ElementId,
        result: &GestureResult,
    ) -> Option<TransformOutcome> {
        let Some(element) = plan.get(id) else {
            debug!(%id, "drag ignored: element not found");
            return None;
        };
        let target = projection.to_metric(result.final_pixel_position);

        let (position, rotation) = match (element.kind, plan.room()) {
            (ElementKind::Door, Some(room)) => {
                let placement = self.doors.solve(target, element.length(), room);
                (placement.position, placement.rotation)
            }
            _ => (self.snap_pivot(target, element.size_or_zero(), element.rotation), element.rotation),
        };

        let patch = ElementPatch {
            position: Some(position),
            rotation: (rotation != element.rotation).then_some(rotation),
            ..Default::default()
        };
        self.commit(plan, projection, id, patch, position)
    }

    /// Finish a resize. Multiplies the renderer's scale into the stored size,
    /// snaps the size (never below one quantum), and re-anchors so the
    /// footprint's top-left lands on the grid.
    ///
    /// A door in a plan with a room keeps its depth and is re-glued to the
    /// wall nearest the resized footprint's center instead.
    ///
    /// Unsized labels cannot be resized and return `None`.
    pub fn resize_end(
        &self,
        plan: &mut Plan,
        projection: &Projection,
        id: &ElementId,
        result: &GestureResult,
    ) -> Option<TransformOutcome> {
        let Some(element) = plan.get(id) else {
            debug!(%id, "resize ignored: element not found");
            return None;
        };
        let Some(size) = element.size else {
            debug!(%id, "resize ignored: element has no size");
            return None;
        };
        let scale = result.final_pixel_scale.sanitized();
        let raw = Size::new(size.width * scale.x, size.height * scale.y);
        let snapped = self.snapper.snap_size(raw);

        // Where the scaled footprint actually sits on screen right now.
        let pivot = projection.to_metric(result.final_pixel_position);
        let raw_origin = visual_origin(pivot, raw, element.rotation);

        let (position, size, rotation) = match (element.kind, plan.room()) {
            (ElementKind::Door, Some(room)) => {
                let resized = Size::new(snapped.width, size.height);
                let center = BoundingBox::from_origin_size(raw_origin, visual_size(raw, element.rotation)).center();
                let placement = self.doors.solve_centered(center, resized.width, room);
                (placement.position, resized, placement.rotation)
            }
            _ => {
                let origin = self.snapper.snap_point(raw_origin);
                (position_for_visual_origin(origin, snapped, element.rotation), snapped, element.rotation)
            }
        };

        let patch = ElementPatch {
            position: Some(position),
            size: Some(size),
            rotation: (rotation != element.rotation).then_some(rotation),
            ..Default::default()
        };
        self.commit(plan, projection, id, patch, position)
    }

    /// Rotate by 90° around the footprint's center.
    ///
    /// [`RotationSnap::PreserveCenter`] is the default because a quarter turn
    /// must leave the footprint's center where it was; re-snapping the
    /// rotated corner to the grid can move the center by half a quantum.
    pub fn rotate(&self, plan: &mut Plan, projection: &Projection, id: &ElementId) -> Option<TransformOutcome> {
        let Some(element) = plan.get(id) else {
            debug!(%id, "rotate ignored: element not found");
            return None;
        };
        let size = element.size_or_zero();
        let rotation = element.rotation.quarter_turn();
        let centered = position_for_center(element.center(), size, rotation);
        let position = match self.rotation_snap {
            RotationSnap::PreserveCenter => centered,
            RotationSnap::GridCorner => self.snap_pivot(centered, size, rotation),
        };

        let patch = ElementPatch { position: Some(position), rotation: Some(rotation), ..Default::default() };
        self.commit(plan, projection, id, patch, position)
    }

    /// Snap the footprint's top-left to the grid and return the matching pivot.
    fn snap_pivot(&self, pivot: Point, size: Size, rotation: Rotation) -> Point {
        let origin = self.snapper.snap_point(visual_origin(pivot, size, rotation));
        position_for_visual_origin(origin, size, rotation)
    }

    fn commit(
        &self,
        plan: &mut Plan,
        projection: &Projection,
        id: &ElementId,
        patch: ElementPatch,
        position: Point,
    ) -> Option<TransformOutcome> {
        match plan.update_element(id, &patch) {
            Ok(true) => Some(TransformOutcome {
                id: id.clone(),
                patch,
                node_position: projection.to_pixels(position),
                node_scale: ScaleFactors::IDENTITY,
            }),
            Ok(false) => None,
            Err(e) => {
                debug!(%id, error = %e, "transform rejected");
                None
            }
        }
    }
}
