//! Table lookups for the ordering side: geometry for highlighting and a
//! free/occupied overlay.
//!
//! Orders themselves live elsewhere; this module only sees how many items
//! each active order holds.

#[cfg(test)]
#[path = "occupancy_test.rs"]
mod occupancy_test;

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{ElementId, ElementKind, Plan, Rotation};
use crate::projection::{Point, Size};

/// Label and metric geometry of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    pub id: ElementId,
    pub label: Option<String>,
    pub position: Point,
    pub size: Size,
    pub rotation: Rotation,
}

/// An open order as reported by the ordering subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveOrder {
    pub table_id: ElementId,
    pub item_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Free,
    Occupied,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableOverlay {
    pub table: TableInfo,
    pub status: TableStatus,
}

/// Geometry of `id` if it names a table; `None` for any other kind or a missing id.
#[must_use]
pub fn table_info(plan: &Plan, id: &ElementId) -> Option<TableInfo> {
    let element = plan.get(id).filter(|e| e.kind == ElementKind::Table)?;
    Some(TableInfo {
        id: element.id.clone(),
        label: element.label.clone(),
        position: element.position,
        size: element.size_or_zero(),
        rotation: element.rotation,
    })
}

/// Every table with its status. A table is occupied when an active order for
/// it holds at least one item; an empty order leaves it free.
#[must_use]
pub fn overlay(plan: &Plan, orders: &[ActiveOrder]) -> Vec<TableOverlay> {
    let mut items: HashMap<&ElementId, usize> = HashMap::new();
    for order in orders {
        *items.entry(&order.table_id).or_default() += order.item_count;
    }

    plan.elements()
        .iter()
        .filter(|e| e.kind == ElementKind::Table)
        .filter_map(|e| table_info(plan, &e.id))
        .map(|table| {
            let status = if items.get(&table.id).copied().unwrap_or(0) > 0 {
                TableStatus::Occupied
            } else {
                TableStatus::Free
            };
            TableOverlay { table, status }
        })
        .collect()
}
