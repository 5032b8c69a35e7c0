//! Metric model: floor-plan elements, their geometry, and the ordered plan store.
//!
//! This module defines what is drawn on the floor plan (`Element`,
//! `ElementKind`), the right-angle `Rotation`, a sparse-update type for
//! incremental edits (`ElementPatch`), and the runtime store that owns the
//! element sequence (`Plan`). Every coordinate here is in meters; pixel
//! geometry is derived on demand by [`crate::projection`].
//!
//! Rotation pivots around `position`, the element's pre-rotation top-left
//! corner, which is also the origin the renderer places the node at. The
//! visual bounding box of a rotated element is derived from that pivot: see
//! [`Element::visual_origin`].

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::projection::{Point, Size};

/// Opaque, immutable element identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The kind of a floor-plan element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Free-standing wall piece.
    Wall,
    /// The room outline; its four sides are the walls doors snap to.
    Room,
    /// Door glued to one of the room's walls.
    Door,
    /// Dining table.
    #[serde(alias = "rect")]
    Table,
    /// Bar or service counter.
    #[serde(alias = "bancone")]
    Counter,
    /// Text annotation.
    #[serde(alias = "text")]
    Label,
}

impl ElementKind {
    /// Whether elements of this kind must carry a positive size.
    #[must_use]
    pub fn requires_size(self) -> bool {
        !matches!(self, Self::Label)
    }
}

/// Clockwise rotation constrained to right angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Nearest right angle to `degrees`, taken modulo 360. Non-finite input maps to 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_degrees(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Self::Deg0;
        }
        let quarters = ((degrees / 90.0).round() as i64).rem_euclid(4);
        match quarters {
            1 => Self::Deg90,
            2 => Self::Deg180,
            3 => Self::Deg270,
            _ => Self::Deg0,
        }
    }

    /// This rotation plus 90°, mod 360.
    #[must_use]
    pub fn quarter_turn(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// True for 90° and 270°, where visual width and height swap.
    #[must_use]
    pub fn is_sideways(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

impl Serialize for Rotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.degrees())
    }
}

impl<'de> Deserialize<'de> for Rotation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let degrees = f64::deserialize(deserializer)?;
        Ok(Self::from_degrees(degrees))
    }
}

/// Axis-aligned box in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + size.width,
            max_y: origin.y + size.height,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    #[must_use]
    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grow (or shrink, for negative `by`) every side by `by`.
    #[must_use]
    pub fn inflate(self, by: f64) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x - by,
            min_y: self.min_y - by,
            max_x: self.max_x + by,
            max_y: self.max_y + by,
        }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// A drawable floor-plan element. All lengths are in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Assigned at creation and never changed.
    pub id: ElementId,
    pub kind: ElementKind,
    /// Pre-rotation top-left corner; also the rotation pivot.
    pub position: Point,
    /// Required for every kind except `Label`.
    pub size: Option<Size>,
    pub rotation: Rotation,
    /// Table number, custom object name, or annotation text.
    pub label: Option<String>,
    /// Only meaningful for `Label`.
    pub font_size: Option<f64>,
    /// Stored fields this crate does not interpret, carried through untouched.
    pub props: serde_json::Map<String, serde_json::Value>,
}

impl Element {
    /// New unrotated element with a fresh id.
    #[must_use]
    pub fn new(kind: ElementKind, position: Point, size: Option<Size>) -> Self {
        Self {
            id: ElementId::generate(),
            kind,
            position,
            size,
            rotation: Rotation::Deg0,
            label: None,
            font_size: None,
            props: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Size, or zero for unsized labels.
    #[must_use]
    pub fn size_or_zero(&self) -> Size {
        self.size.unwrap_or_default()
    }

    /// Size after the 90°/270° axis swap.
    #[must_use]
    pub fn visual_size(&self) -> Size {
        visual_size(self.size_or_zero(), self.rotation)
    }

    /// Top-left corner of the rotated footprint.
    #[must_use]
    pub fn visual_origin(&self) -> Point {
        visual_origin(self.position, self.size_or_zero(), self.rotation)
    }

    /// Midpoint of the rotated footprint.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Axis-aligned box of the rotated footprint.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_origin_size(self.visual_origin(), self.visual_size())
    }

    /// Long-axis length (the unrotated width).
    #[must_use]
    pub fn length(&self) -> f64 {
        self.size_or_zero().width
    }

    /// Check the size invariant for this element's kind.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when a sized kind has no size or a
    /// non-positive one, or when a label carries a non-positive size.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.size {
            None if self.kind.requires_size() => Err(ValidationError::MissingSize { kind: self.kind }),
            Some(size) if !size.is_positive() => Err(ValidationError::NonPositiveSize {
                kind: self.kind,
                width: size.width,
                height: size.height,
            }),
            _ => Ok(()),
        }
    }
}

/// Size after the 90°/270° axis swap.
#[must_use]
pub fn visual_size(size: Size, rotation: Rotation) -> Size {
    if rotation.is_sideways() { size.swapped() } else { size }
}

/// Top-left corner of the footprint of a `size` rectangle rotated clockwise
/// by `rotation` around `position`.
#[must_use]
pub fn visual_origin(position: Point, size: Size, rotation: Rotation) -> Point {
    match rotation {
        Rotation::Deg0 => position,
        Rotation::Deg90 => Point::new(position.x - size.height, position.y),
        Rotation::Deg180 => Point::new(position.x - size.width, position.y - size.height),
        Rotation::Deg270 => Point::new(position.x, position.y - size.width),
    }
}

/// Inverse of [`visual_origin`]: the pivot that puts the footprint's top-left at `origin`.
#[must_use]
pub fn position_for_visual_origin(origin: Point, size: Size, rotation: Rotation) -> Point {
    match rotation {
        Rotation::Deg0 => origin,
        Rotation::Deg90 => Point::new(origin.x + size.height, origin.y),
        Rotation::Deg180 => Point::new(origin.x + size.width, origin.y + size.height),
        Rotation::Deg270 => Point::new(origin.x, origin.y + size.width),
    }
}

/// The pivot that puts the footprint's midpoint at `center`.
#[must_use]
pub fn position_for_center(center: Point, size: Size, rotation: Rotation) -> Point {
    let visual = visual_size(size, rotation);
    let origin = Point::new(center.x - visual.width / 2.0, center.y - visual.height / 2.0);
    position_for_visual_origin(origin, size, rotation)
}

/// Bounding box of the given elements, or `None` when there are none.
///
/// Callers must handle `None` explicitly; an empty layout has no extent to
/// divide by.
#[must_use]
pub fn bounding_box<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<BoundingBox> {
    elements
        .into_iter()
        .map(Element::bounds)
        .reduce(BoundingBox::union)
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New pivot position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// New size, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// New rotation, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    /// New label text, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New font size, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl ElementPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Ordered element store. Later elements draw on top of earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    elements: Vec<Element>,
}

impl Plan {
    /// Create an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Append an element, assigning an id if it has none.
    ///
    /// An element whose id already exists replaces the old one in place.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the size is missing or non-positive for
    /// its kind, or if a second room is added.
    pub fn add_element(&mut self, mut element: Element) -> Result<ElementId, ValidationError> {
        element.validate()?;
        if element.id.is_empty() {
            element.id = ElementId::generate();
        }
        if element.kind == ElementKind::Room && self.room().is_some_and(|room| room.id != element.id) {
            return Err(ValidationError::RoomExists);
        }
        let id = element.id.clone();
        if let Some(slot) = self.elements.iter_mut().find(|e| e.id == id) {
            *slot = element;
        } else {
            debug!(%id, kind = ?element.kind, "element added");
            self.elements.push(element);
        }
        Ok(id)
    }

    /// Merge `patch` into the element with `id`.
    ///
    /// Returns `Ok(false)` when no such element exists; the caller's view was stale.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the patch would leave a non-positive
    /// size. The element is unchanged in that case.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> Result<bool, ValidationError> {
        let Some(element) = self.elements.iter_mut().find(|e| &e.id == id) else {
            debug!(%id, "update ignored: element not found");
            return Ok(false);
        };
        if let Some(size) = patch.size {
            if !size.is_positive() {
                return Err(ValidationError::NonPositiveSize {
                    kind: element.kind,
                    width: size.width,
                    height: size.height,
                });
            }
            element.size = Some(size);
        }
        if let Some(position) = patch.position {
            element.position = position;
        }
        if let Some(rotation) = patch.rotation {
            element.rotation = rotation;
        }
        if let Some(ref label) = patch.label {
            element.label = Some(label.clone());
        }
        if let Some(font_size) = patch.font_size {
            element.font_size = Some(font_size);
        }
        Ok(true)
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| &e.id == id)?;
        debug!(%id, "element removed");
        Some(self.elements.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// The room, if the plan has one.
    #[must_use]
    pub fn room(&self) -> Option<&Element> {
        self.elements.iter().find(|e| e.kind == ElementKind::Room)
    }

    /// Elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements of `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind == kind).count()
    }

    /// Replace every element with `elements`, skipping any that fail validation.
    ///
    /// Returns how many were rejected.
    pub fn replace_all(&mut self, elements: Vec<Element>) -> usize {
        self.elements.clear();
        let mut rejected = 0;
        for element in elements {
            if self.add_element(element).is_err() {
                rejected += 1;
            }
        }
        rejected
    }

    /// Bounding box of every element, or `None` for an empty plan.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        bounding_box(&self.elements)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
