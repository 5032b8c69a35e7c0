//! Persisted layout record and the legacy pixel-to-metric migration.
//!
//! DESIGN
//! ======
//! One record per restaurant:
//!
//! ```json
//! { "elements": [ { "id", "kind", "x", "y", "width", "height",
//!                   "rotationDegrees", "label", "fontSize", "normalized": true } ],
//!   "roomDimensions": { "width", "height" },
//!   "timestamp": 1700000000000 }
//! ```
//!
//! Elements without `"normalized": true` predate the metric model and are in
//! pixels at a fixed legacy density. They are decoded as
//! [`RawElement::Legacy`] and converted exactly once by
//! [`RawElement::normalize`]; every element written back is metric and
//! flagged.
//!
//! Keys this crate does not know, at record or element level, are kept in
//! flattened maps and written back untouched.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::model::{Element, ElementId, ElementKind, Plan, Rotation};
use crate::projection::{Point, Size};

/// Interior room size in meters, as last entered for "create room".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self { width: 10.0, height: 5.0 }
    }
}

impl RoomDimensions {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One element as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: ElementId,
    #[serde(alias = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, alias = "rotation", skip_serializing_if = "Option::is_none")]
    pub rotation_degrees: Option<Rotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub normalized: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole stored layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    #[serde(default, alias = "elementi")]
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub room_dimensions: RoomDimensions,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Element fields without a unit marker; the enclosing [`RawElement`] says which unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementFields {
    pub id: ElementId,
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Rotation,
    pub label: Option<String>,
    pub font_size: Option<f64>,
    pub extra: Map<String, Value>,
}

/// A stored element tagged with its unit system.
#[derive(Debug, Clone, PartialEq)]
pub enum RawElement {
    /// Pixels at the legacy density.
    Legacy(ElementFields),
    /// Meters.
    Normalized(ElementFields),
}

impl From<ElementRecord> for RawElement {
    fn from(record: ElementRecord) -> Self {
        let fields = ElementFields {
            id: record.id,
            kind: record.kind,
            x: record.x,
            y: record.y,
            width: record.width,
            height: record.height,
            rotation: record.rotation_degrees.unwrap_or_default(),
            label: record.label,
            font_size: record.font_size,
            extra: record.extra,
        };
        if record.normalized { Self::Normalized(fields) } else { Self::Legacy(fields) }
    }
}

impl RawElement {
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Convert to a metric element, dividing legacy lengths by `legacy_pixels_per_meter`.
    #[must_use]
    pub fn normalize(self, legacy_pixels_per_meter: f64) -> Element {
        let (fields, k) = match self {
            Self::Legacy(fields) => (fields, legacy_pixels_per_meter),
            Self::Normalized(fields) => (fields, 1.0),
        };
        let size = match (fields.width, fields.height) {
            (Some(w), Some(h)) => Some(Size::new(w / k, h / k)),
            _ if fields.kind == ElementKind::Label => None,
            (Some(side), None) | (None, Some(side)) => Some(Size::new(side / k, side / k)),
            (None, None) => None,
        };
        Element {
            id: fields.id,
            kind: fields.kind,
            position: Point::new(fields.x / k, fields.y / k),
            size,
            rotation: fields.rotation,
            label: fields.label,
            font_size: fields.font_size.map(|f| f / k),
            props: fields.extra,
        }
    }
}

impl From<&Element> for ElementRecord {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.clone(),
            kind: element.kind,
            x: element.position.x,
            y: element.position.y,
            width: element.size.map(|s| s.width),
            height: element.size.map(|s| s.height),
            rotation_degrees: Some(element.rotation),
            label: element.label.clone(),
            font_size: element.font_size,
            normalized: true,
            extra: element.props.clone(),
        }
    }
}

/// Outcome of turning a stored record into a plan.
#[derive(Debug, Clone, Default)]
pub struct LoadedLayout {
    pub plan: Plan,
    pub room_dimensions: RoomDimensions,
    /// Elements converted from legacy pixels.
    pub migrated: usize,
    /// Elements whose missing or non-positive size was replaced.
    pub repaired: usize,
}

impl LayoutRecord {
    /// Build a record from the plan.
    #[must_use]
    pub fn from_plan(plan: &Plan, room_dimensions: RoomDimensions, timestamp: i64) -> Self {
        Self {
            elements: plan.elements().iter().map(ElementRecord::from).collect(),
            room_dimensions,
            timestamp,
            extra: Map::new(),
        }
    }

    /// Overwrite the fields this crate owns, leaving unknown keys alone.
    pub fn apply_plan(&mut self, plan: &Plan, room_dimensions: RoomDimensions, timestamp: i64) {
        self.elements = plan.elements().iter().map(ElementRecord::from).collect();
        self.room_dimensions = room_dimensions;
        self.timestamp = timestamp;
    }

    /// Decode into a metric plan, migrating legacy elements.
    ///
    /// Sized kinds with a missing or non-positive size get `min_size` on the
    /// bad axis rather than being dropped, so a later save does not lose them.
    #[must_use]
    pub fn to_plan(&self, legacy_pixels_per_meter: f64, min_size: f64) -> LoadedLayout {
        let mut migrated = 0;
        let mut repaired = 0;
        let mut elements = Vec::with_capacity(self.elements.len());

        for record in &self.elements {
            let raw = RawElement::from(record.clone());
            if raw.is_legacy() {
                migrated += 1;
            }
            let mut element = raw.normalize(legacy_pixels_per_meter);
            if element.validate().is_err() {
                let size = element.size_or_zero();
                let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { min_size };
                element.size = Some(Size::new(fix(size.width), fix(size.height)));
                warn!(id = %element.id, kind = ?element.kind, "repaired invalid element size on load");
                repaired += 1;
            }
            elements.push(element);
        }

        let mut plan = Plan::new();
        let rejected = plan.replace_all(elements);
        if rejected > 0 {
            warn!(rejected, "dropped elements that could not be loaded");
        }
        if migrated > 0 {
            info!(migrated, "converted legacy pixel elements to meters");
        }
        LoadedLayout { plan, room_dimensions: self.room_dimensions, migrated, repaired }
    }
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
