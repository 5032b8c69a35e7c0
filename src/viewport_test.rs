#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<BoundingBox> {
    Some(BoundingBox { min_x, min_y, max_x, max_y })
}

// =============================================================
// fit
// =============================================================

#[test]
fn empty_layout_gets_identity_viewport() {
    let v = fit(None, 80.0, Size::new(800.0, 600.0), &FitOptions::existing_layout());
    assert_eq!(v, Viewport::default());
}

#[test]
fn existing_layout_shrinks_to_fit_and_pins_left() {
    // 10 x 5 m at 80 px/m is 800 x 400 px.
    let v = fit(rect(0.0, 0.0, 10.0, 5.0), 80.0, Size::new(420.0, 300.0), &FitOptions::existing_layout());
    let expected = 420.0 / 820.0;
    assert!(approx_eq(v.scale, expected));
    assert!(approx_eq(v.offset.x, 20.0));
    assert!(approx_eq(v.offset.y, (300.0 - 400.0 * expected) / 2.0));
}

#[test]
fn existing_layout_never_zooms_in() {
    let v = fit(rect(0.0, 0.0, 1.0, 1.0), 80.0, Size::new(2000.0, 2000.0), &FitOptions::existing_layout());
    assert_eq!(v.scale, 1.0);
}

#[test]
fn new_room_may_zoom_in_up_to_limit() {
    let v = fit(rect(0.0, 0.0, 1.0, 1.0), 80.0, Size::new(2000.0, 2000.0), &FitOptions::new_room());
    assert_eq!(v.scale, 1.5);
}

#[test]
fn huge_layout_clamps_to_min_scale() {
    let v = fit(rect(0.0, 0.0, 1000.0, 1000.0), 80.0, Size::new(300.0, 300.0), &FitOptions::existing_layout());
    assert_eq!(v.scale, 0.1);
}

#[test]
fn new_room_is_centered() {
    let bounds = rect(-0.125, -0.125, 10.125, 5.125);
    let container = Size::new(1000.0, 700.0);
    let v = fit(bounds, 80.0, container, &FitOptions::new_room());
    let p = Projection::new(80.0, v);
    let center = p.to_pixels(Point::new(5.0, 2.5));
    assert!(point_approx_eq(center, Point::new(500.0, 350.0)), "{center:?}");
}

#[test]
fn left_alignment_uses_content_min_x() {
    let v = fit(rect(-2.0, 0.0, 3.0, 1.0), 80.0, Size::new(2000.0, 2000.0), &FitOptions::existing_layout());
    let p = Projection::new(80.0, v);
    assert!(approx_eq(p.to_pixels(Point::new(-2.0, 0.0)).x, 20.0));
}

#[test]
fn zero_container_does_not_produce_nan() {
    let v = fit(rect(0.0, 0.0, 10.0, 5.0), 80.0, Size::new(0.0, 0.0), &FitOptions::existing_layout());
    assert_eq!(v.scale, 0.1);
    assert!(v.offset.x.is_finite() && v.offset.y.is_finite());
}

#[test]
fn zero_extent_and_zero_padding_does_not_divide_by_zero() {
    let options = FitOptions { padding: 0.0, ..FitOptions::new_room() };
    let v = fit(rect(2.0, 2.0, 2.0, 2.0), 80.0, Size::new(500.0, 500.0), &options);
    assert_eq!(v.scale, 1.5);
    assert!(v.offset.x.is_finite() && v.offset.y.is_finite());
}

#[test]
fn fitted_scale_always_within_bounds() {
    let options = FitOptions::existing_layout();
    for (w, h) in [(0.1, 0.1), (3.0, 2.0), (40.0, 12.0), (500.0, 3.0)] {
        for container in [Size::new(320.0, 480.0), Size::new(1920.0, 1080.0), Size::new(10.0, 10.0)] {
            let v = fit(rect(0.0, 0.0, w, h), 80.0, container, &options);
            assert!(v.scale >= options.min_scale && v.scale <= options.max_scale, "{w}x{h} in {container:?}");
        }
    }
}

// =============================================================
// PinchZoom
// =============================================================

fn identity_projection() -> Projection {
    Projection::new(80.0, Viewport::default())
}

#[test]
fn first_two_finger_frame_only_records() {
    let mut pinch = PinchZoom::default();
    let out = pinch.on_touch_move(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)], &identity_projection());
    assert!(out.is_none());
    assert!(pinch.is_active());
}

#[test]
fn pinch_keeps_point_under_fingers_fixed() {
    let mut pinch = PinchZoom::default();
    let projection = identity_projection();
    pinch.on_touch_move(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)], &projection);
    let v = pinch
        .on_touch_move(&[Point::new(50.0, 100.0), Point::new(250.0, 100.0)], &projection)
        .unwrap();

    assert!(approx_eq(v.scale, 2.0));
    assert!(point_approx_eq(v.offset, Point::new(-150.0, -100.0)));

    let anchor = projection.to_metric(Point::new(150.0, 100.0));
    let after = Projection::new(80.0, v);
    assert!(point_approx_eq(after.to_pixels(anchor), Point::new(150.0, 100.0)));
}

#[test]
fn pinch_anchor_holds_with_existing_pan_and_zoom() {
    let mut pinch = PinchZoom::default();
    let projection = Projection::new(40.0, Viewport { scale: 0.8, offset: Point::new(-33.0, 12.0) });
    pinch.on_touch_move(&[Point::new(300.0, 200.0), Point::new(400.0, 260.0)], &projection);
    let v = pinch
        .on_touch_move(&[Point::new(280.0, 190.0), Point::new(420.0, 270.0)], &projection)
        .unwrap();

    let anchor = projection.to_metric(Point::new(350.0, 230.0));
    let after = Projection::new(40.0, v);
    assert!(point_approx_eq(after.to_pixels(anchor), Point::new(350.0, 230.0)));
}

#[test]
fn pinch_scale_is_clamped() {
    let mut pinch = PinchZoom::new(0.2, 2.0);
    let projection = Projection::new(80.0, Viewport { scale: 1.5, offset: Point::default() });
    pinch.on_touch_move(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], &projection);
    let v = pinch.on_touch_move(&[Point::new(0.0, 0.0), Point::new(400.0, 0.0)], &projection).unwrap();
    assert_eq!(v.scale, 2.0);

    let mut pinch = PinchZoom::new(0.2, 2.0);
    let projection = Projection::new(80.0, Viewport { scale: 0.3, offset: Point::default() });
    pinch.on_touch_move(&[Point::new(0.0, 0.0), Point::new(400.0, 0.0)], &projection);
    let v = pinch.on_touch_move(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], &projection).unwrap();
    assert_eq!(v.scale, 0.2);
}

#[test]
fn single_finger_resets_reference() {
    let mut pinch = PinchZoom::default();
    let projection = identity_projection();
    pinch.on_touch_move(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], &projection);
    assert!(pinch.on_touch_move(&[Point::new(0.0, 0.0)], &projection).is_none());
    assert!(!pinch.is_active());
}

#[test]
fn touch_end_below_two_fingers_resets() {
    let mut pinch = PinchZoom::default();
    let projection = identity_projection();
    pinch.on_touch_move(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], &projection);
    pinch.on_touch_end(2);
    assert!(pinch.is_active());
    pinch.on_touch_end(1);
    assert!(!pinch.is_active());

    // A new pinch starts from its own first frame, not the stale one.
    let out = pinch.on_touch_move(&[Point::new(0.0, 0.0), Point::new(300.0, 0.0)], &projection);
    assert!(out.is_none());
}

#[test]
fn coincident_fingers_do_not_divide_by_zero() {
    let mut pinch = PinchZoom::default();
    let projection = identity_projection();
    pinch.on_touch_move(&[Point::new(50.0, 50.0), Point::new(50.0, 50.0)], &projection);
    assert!(pinch.on_touch_move(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], &projection).is_none());
}
