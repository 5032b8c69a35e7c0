use super::*;
use crate::model::Element;

fn plan_with_tables() -> (Plan, ElementId, ElementId, ElementId) {
    let mut plan = Plan::new();
    let t1 = plan
        .add_element(Element::new(ElementKind::Table, Point::new(1.0, 1.0), Some(Size::new(1.0, 1.0))).with_label("T1"))
        .unwrap();
    let t2 = plan
        .add_element(
            Element::new(ElementKind::Table, Point::new(3.0, 1.0), Some(Size::new(2.0, 1.0)))
                .with_label("T2")
                .with_rotation(Rotation::Deg90),
        )
        .unwrap();
    let counter = plan
        .add_element(Element::new(ElementKind::Counter, Point::new(0.0, 4.0), Some(Size::new(3.0, 0.5))).with_label("Bar"))
        .unwrap();
    (plan, t1, t2, counter)
}

#[test]
fn table_info_returns_geometry() {
    let (plan, _, t2, _) = plan_with_tables();
    let info = table_info(&plan, &t2).unwrap();
    assert_eq!(info.label.as_deref(), Some("T2"));
    assert_eq!(info.position, Point::new(3.0, 1.0));
    assert_eq!(info.size, Size::new(2.0, 1.0));
    assert_eq!(info.rotation, Rotation::Deg90);
}

#[test]
fn table_info_is_none_for_other_kinds_and_missing_ids() {
    let (plan, _, _, counter) = plan_with_tables();
    assert!(table_info(&plan, &counter).is_none());
    assert!(table_info(&plan, &ElementId::from("nope")).is_none());
}

#[test]
fn overlay_marks_tables_with_items_occupied() {
    let (plan, t1, t2, counter) = plan_with_tables();
    let orders = vec![
        ActiveOrder { table_id: t1.clone(), item_count: 3 },
        ActiveOrder { table_id: t2.clone(), item_count: 0 },
        ActiveOrder { table_id: counter, item_count: 5 },
    ];
    let overlay = overlay(&plan, &orders);
    assert_eq!(overlay.len(), 2);
    assert_eq!(overlay[0].table.id, t1);
    assert_eq!(overlay[0].status, TableStatus::Occupied);
    assert_eq!(overlay[1].table.id, t2);
    assert_eq!(overlay[1].status, TableStatus::Free);
}

#[test]
fn overlay_without_orders_is_all_free() {
    let (plan, ..) = plan_with_tables();
    assert!(overlay(&plan, &[]).iter().all(|o| o.status == TableStatus::Free));
}

#[test]
fn status_serializes_lowercase() {
    assert_eq!(serde_json::to_value(TableStatus::Occupied).unwrap(), serde_json::json!("occupied"));
}
