#![allow(clippy::float_cmp)]

use super::*;
use crate::model::Element;
use crate::projection::Viewport;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn on_grid(v: f64) -> bool {
    approx_eq((v / 0.25).round() * 0.25, v)
}

fn controller(rotation_snap: RotationSnap) -> TransformController {
    TransformController::new(GridSnapper::new(0.25), DoorSolver::new(0.25), rotation_snap)
}

/// 80 px/m, no zoom, no pan: one meter is 80 pixels.
fn projection() -> Projection {
    Projection::new(80.0, Viewport::default())
}

fn plan_with(element: Element) -> (Plan, ElementId) {
    let mut plan = Plan::new();
    let id = plan.add_element(element).unwrap();
    (plan, id)
}

fn table(x: f64, y: f64, w: f64, h: f64) -> Element {
    Element::new(ElementKind::Table, Point::new(x, y), Some(Size::new(w, h)))
}

// =============================================================
// drag_end
// =============================================================

#[test]
fn drag_snaps_position_to_grid() {
    let (mut plan, id) = plan_with(table(0.0, 0.0, 1.0, 1.0));
    let c = controller(RotationSnap::default());
    // 1.1 m, 2.9 m in pixels.
    let result = GestureResult::moved_to(Point::new(88.0, 232.0));
    let outcome = c.drag_end(&mut plan, &projection(), &id, &result).unwrap();

    let e = plan.get(&id).unwrap();
    assert!(point_approx_eq(e.position, Point::new(1.0, 3.0)));
    assert!(point_approx_eq(outcome.node_position, Point::new(80.0, 240.0)));
    assert_eq!(outcome.node_scale, ScaleFactors::IDENTITY);
    assert_eq!(outcome.patch.rotation, None);
}

#[test]
fn drag_of_rotated_element_snaps_visual_corner() {
    let (mut plan, id) = plan_with(table(0.0, 0.0, 1.5, 0.5).with_rotation(Rotation::Deg90));
    let c = controller(RotationSnap::default());
    let result = GestureResult::moved_to(Point::new(1.13 * 80.0, 2.07 * 80.0));
    c.drag_end(&mut plan, &projection(), &id, &result).unwrap();

    let e = plan.get(&id).unwrap();
    let origin = e.visual_origin();
    assert!(on_grid(origin.x) && on_grid(origin.y), "{origin:?}");
}

#[test]
fn drag_under_zoom_still_snaps_in_meters() {
    let (mut plan, id) = plan_with(table(0.0, 0.0, 1.0, 1.0));
    let c = controller(RotationSnap::default());
    let zoomed = Projection::new(80.0, Viewport { scale: 0.37, offset: Point::new(13.0, -7.0) });
    let result = GestureResult::moved_to(zoomed.to_pixels(Point::new(2.6, 0.9)));
    c.drag_end(&mut plan, &zoomed, &id, &result).unwrap();
    assert!(point_approx_eq(plan.get(&id).unwrap().position, Point::new(2.5, 1.0)));
}

#[test]
fn drag_on_missing_id_is_noop() {
    let (mut plan, _) = plan_with(table(0.0, 0.0, 1.0, 1.0));
    let before = plan.elements().to_vec();
    let c = controller(RotationSnap::default());
    let outcome = c.drag_end(&mut plan, &projection(), &ElementId::from("gone"), &GestureResult::moved_to(Point::default()));
    assert!(outcome.is_none());
    assert_eq!(plan.elements(), before.as_slice());
}

#[test]
fn door_drag_glues_to_nearest_wall() {
    let mut plan = Plan::new();
    plan.add_element(Element::new(ElementKind::Room, Point::new(0.0, 0.0), Some(Size::new(4.0, 4.0)))).unwrap();
    let door_id = plan.add_element(Element::new(ElementKind::Door, Point::new(1.0, 1.0), Some(Size::new(1.0, 0.25)))).unwrap();
    let c = controller(RotationSnap::default());

    let result = GestureResult::moved_to(Point::new(0.2 * 80.0, 1.4 * 80.0));
    let outcome = c.drag_end(&mut plan, &projection(), &door_id, &result).unwrap();
    let door = plan.get(&door_id).unwrap();
    assert_eq!(door.rotation, Rotation::Deg90);
    assert!(point_approx_eq(door.position, Point::new(0.125, 1.4)));
    assert_eq!(outcome.patch.rotation, Some(Rotation::Deg90));

    // Back onto a horizontal wall: rotation returns to 0.
    let result = GestureResult::moved_to(Point::new(2.0 * 80.0, 3.9 * 80.0));
    c.drag_end(&mut plan, &projection(), &door_id, &result).unwrap();
    let door = plan.get(&door_id).unwrap();
    assert_eq!(door.rotation, Rotation::Deg0);
    assert!(point_approx_eq(door.position, Point::new(2.0, 3.875)));
}

#[test]
fn door_without_room_snaps_like_anything_else() {
    let (mut plan, id) = plan_with(Element::new(ElementKind::Door, Point::default(), Some(Size::new(1.0, 0.25))));
    let c = controller(RotationSnap::default());
    c.drag_end(&mut plan, &projection(), &id, &GestureResult::moved_to(Point::new(90.0, 90.0))).unwrap();
    let door = plan.get(&id).unwrap();
    assert!(point_approx_eq(door.position, Point::new(1.25, 1.25)));
    assert_eq!(door.rotation, Rotation::Deg0);
}

// =============================================================
// resize_end
// =============================================================

#[test]
fn resize_multiplies_scale_and_snaps() {
    let (mut plan, id) = plan_with(table(1.0, 1.0, 1.0, 1.0));
    let c = controller(RotationSnap::default());
    let result = GestureResult::scaled(Point::new(80.0, 80.0), ScaleFactors::new(1.6, 0.9));
    let outcome = c.resize_end(&mut plan, &projection(), &id, &result).unwrap();

    let e = plan.get(&id).unwrap();
    assert_eq!(e.size, Some(Size::new(1.5, 1.0)));
    assert!(point_approx_eq(e.position, Point::new(1.0, 1.0)));
    assert_eq!(outcome.node_scale, ScaleFactors::IDENTITY);
    assert_eq!(outcome.patch.size, Some(Size::new(1.5, 1.0)));
}

#[test]
fn resize_never_goes_below_one_quantum() {
    let (mut plan, id) = plan_with(table(0.0, 0.0, 1.0, 1.0));
    let c = controller(RotationSnap::default());
    let result = GestureResult::scaled(Point::default(), ScaleFactors::new(0.01, 0.05));
    c.resize_end(&mut plan, &projection(), &id, &result).unwrap();
    assert_eq!(plan.get(&id).unwrap().size, Some(Size::new(0.25, 0.25)));
}

#[test]
fn resize_of_rotated_element_keeps_visual_corner_on_grid() {
    for rotation in [Rotation::Deg90, Rotation::Deg180, Rotation::Deg270] {
        let (mut plan, id) = plan_with(table(3.0, 3.0, 1.0, 0.5).with_rotation(rotation));
        let c = controller(RotationSnap::default());
        let pivot_px = projection().to_pixels(Point::new(3.07, 2.96));
        let result = GestureResult::scaled(pivot_px, ScaleFactors::new(1.3, 1.7));
        c.resize_end(&mut plan, &projection(), &id, &result).unwrap();

        let e = plan.get(&id).unwrap();
        let size = e.size.unwrap();
        assert!(on_grid(size.width) && on_grid(size.height), "{rotation:?}: {size:?}");
        let origin = e.visual_origin();
        assert!(on_grid(origin.x) && on_grid(origin.y), "{rotation:?}: {origin:?}");
    }
}

#[test]
fn door_resize_keeps_depth_and_wall() {
    let mut plan = Plan::new();
    plan.add_element(Element::new(ElementKind::Room, Point::new(0.0, 0.0), Some(Size::new(4.0, 4.0)))).unwrap();
    // Vertical door at the top end of the right wall.
    let door_id = plan
        .add_element(
            Element::new(ElementKind::Door, Point::new(4.125, 0.0), Some(Size::new(1.0, 0.25)))
                .with_rotation(Rotation::Deg90),
        )
        .unwrap();
    let c = controller(RotationSnap::default());

    let result = GestureResult::scaled(Point::new(4.125 * 80.0, 0.0), ScaleFactors::new(1.5, 1.0));
    let outcome = c.resize_end(&mut plan, &projection(), &door_id, &result).unwrap();
    let door = plan.get(&door_id).unwrap();
    assert_eq!(door.size, Some(Size::new(1.5, 0.25)));
    assert_eq!(door.rotation, Rotation::Deg90);
    assert!(point_approx_eq(door.position, Point::new(4.125, 0.0)));
    assert!(approx_eq(door.bounds().center().x, 4.0));
    assert_eq!(outcome.patch.rotation, None);
}

#[test]
fn resize_of_unsized_label_is_ignored() {
    let (mut plan, id) = plan_with(Element::new(ElementKind::Label, Point::default(), None));
    let c = controller(RotationSnap::default());
    let result = GestureResult::scaled(Point::default(), ScaleFactors::new(2.0, 2.0));
    assert!(c.resize_end(&mut plan, &projection(), &id, &result).is_none());
    assert!(plan.get(&id).unwrap().size.is_none());
}

// =============================================================
// rotate
// =============================================================

#[test]
fn rotation_preserves_center() {
    for (w, h) in [(1.0, 1.0), (2.0, 1.0), (1.25, 0.5), (3.0, 0.25)] {
        let (mut plan, id) = plan_with(table(2.0, 2.0, w, h));
        let c = controller(RotationSnap::PreserveCenter);
        let center = plan.get(&id).unwrap().center();
        for expected in [Rotation::Deg90, Rotation::Deg180, Rotation::Deg270, Rotation::Deg0] {
            let outcome = c.rotate(&mut plan, &projection(), &id).unwrap();
            let e = plan.get(&id).unwrap();
            assert_eq!(e.rotation, expected);
            assert_eq!(outcome.patch.rotation, Some(expected));
            assert!(point_approx_eq(e.center(), center), "{w}x{h} at {expected:?}");
        }
    }
}

#[test]
fn four_rotations_return_to_start() {
    let (mut plan, id) = plan_with(table(2.0, 2.0, 2.0, 1.0));
    let c = controller(RotationSnap::PreserveCenter);
    for _ in 0..4 {
        c.rotate(&mut plan, &projection(), &id).unwrap();
    }
    let e = plan.get(&id).unwrap();
    assert_eq!(e.rotation, Rotation::Deg0);
    assert!(point_approx_eq(e.position, Point::new(2.0, 2.0)));
}

#[test]
fn grid_corner_rotation_snaps_visual_origin() {
    let (mut plan, id) = plan_with(table(2.0, 2.0, 1.0, 0.5));
    let c = controller(RotationSnap::GridCorner);
    c.rotate(&mut plan, &projection(), &id).unwrap();
    let e = plan.get(&id).unwrap();
    let origin = e.visual_origin();
    assert!(on_grid(origin.x) && on_grid(origin.y), "{origin:?}");
    assert_eq!(e.rotation, Rotation::Deg90);
}

#[test]
fn rotate_missing_is_noop() {
    let mut plan = Plan::new();
    let c = controller(RotationSnap::default());
    assert!(c.rotate(&mut plan, &projection(), &ElementId::from("x")).is_none());
}
