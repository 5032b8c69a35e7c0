use super::*;
use crate::model::Element;
use crate::projection::Size;

const WALL: f64 = 0.25;

fn room_plan() -> (Plan, ElementId) {
    let mut plan = Plan::new();
    let room = plan
        .add_element(Element::new(ElementKind::Room, Point::new(0.0, 0.0), Some(Size::new(10.0, 6.0))))
        .unwrap();
    (plan, room)
}

#[test]
fn empty_plan_hits_nothing() {
    assert!(hit_test(&Plan::new(), Point::new(0.0, 0.0), WALL).is_none());
}

#[test]
fn room_is_hit_on_its_wall_band_only() {
    let (plan, room) = room_plan();
    assert_eq!(hit_test(&plan, Point::new(5.0, 0.1), WALL), Some(room.clone()));
    assert_eq!(hit_test(&plan, Point::new(-0.1, 3.0), WALL), Some(room));
    assert!(hit_test(&plan, Point::new(5.0, 3.0), WALL).is_none());
    assert!(hit_test(&plan, Point::new(5.0, -0.5), WALL).is_none());
}

#[test]
fn topmost_element_wins() {
    let (mut plan, _) = room_plan();
    let below = plan
        .add_element(Element::new(ElementKind::Table, Point::new(1.0, 1.0), Some(Size::new(2.0, 2.0))))
        .unwrap();
    let above = plan
        .add_element(Element::new(ElementKind::Counter, Point::new(2.0, 2.0), Some(Size::new(2.0, 1.0))))
        .unwrap();
    assert_eq!(hit_test(&plan, Point::new(2.5, 2.5), WALL), Some(above));
    assert_eq!(hit_test(&plan, Point::new(1.5, 1.5), WALL), Some(below));
}

#[test]
fn rotated_element_is_hit_on_its_visual_footprint() {
    let mut plan = Plan::new();
    let table = plan
        .add_element(
            Element::new(ElementKind::Table, Point::new(4.0, 1.0), Some(Size::new(2.0, 1.0)))
                .with_rotation(crate::model::Rotation::Deg90),
        )
        .unwrap();
    // Footprint is x 3..4, y 1..3.
    assert_eq!(hit_test(&plan, Point::new(3.5, 2.5), WALL), Some(table));
    assert!(hit_test(&plan, Point::new(5.0, 1.5), WALL).is_none());
}
