#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::model::{ElementId, ElementKind, Plan};
use crate::projection::Point;

/// Topmost element under `metric_pt`, if any.
///
/// Later elements sit on top. A room only counts along its wall band (the
/// outline inflated and deflated by half of `wall_thickness`), so clicks in
/// the open floor fall through to nothing instead of selecting the room.
#[must_use]
pub fn hit_test(plan: &Plan, metric_pt: Point, wall_thickness: f64) -> Option<ElementId> {
    let half = wall_thickness.max(0.0) / 2.0;
    plan.elements()
        .iter()
        .rev()
        .find(|e| {
            let bounds = e.bounds();
            if e.kind == ElementKind::Room {
                bounds.inflate(half).contains(metric_pt) && !bounds.inflate(-half).contains(metric_pt)
            } else {
                bounds.contains(metric_pt)
            }
        })
        .map(|e| e.id.clone())
}
