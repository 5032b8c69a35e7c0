//! Input model: gesture results, selection, and the gesture state machine.
//!
//! The rendering layer owns live scene-graph nodes; this crate never sees
//! them. When a gesture ends the host extracts the node's plain numbers into
//! a [`GestureResult`] and hands that over. `InputState` tracks which element
//! a drag or resize started on, so the end event only needs the numbers.
//!
//! Rotation is a one-shot "rotate 90°" action, so it has no in-progress state.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::model::ElementId;
use crate::projection::Point;

/// Scale factors a renderer applied to a node during a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ScaleFactors {
    pub const IDENTITY: ScaleFactors = ScaleFactors { x: 1.0, y: 1.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Magnitudes with mirroring dropped and garbage replaced by 1.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() && v != 0.0 { v.abs() } else { 1.0 };
        Self { x: clean(self.x), y: clean(self.y) }
    }
}

/// Plain values read off a rendering node when a gesture ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureResult {
    /// Node origin (the element's rotation pivot) in pixels.
    pub final_pixel_position: Point,
    /// Scale the renderer applied during the gesture; identity for drags.
    pub final_pixel_scale: ScaleFactors,
}

impl GestureResult {
    /// Result of a plain drag to `position`.
    #[must_use]
    pub fn moved_to(position: Point) -> Self {
        Self { final_pixel_position: position, final_pixel_scale: ScaleFactors::IDENTITY }
    }

    /// Result of a resize that left the node at `position` with `scale`.
    #[must_use]
    pub fn scaled(position: Point, scale: ScaleFactors) -> Self {
        Self { final_pixel_position: position, final_pixel_scale: scale }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The id of the currently selected element, if any.
    pub selected_id: Option<ElementId>,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// An element is being dragged.
    Dragging {
        /// Id of the element being dragged.
        id: ElementId,
        /// Element position when the drag began; a cancel puts the node back here.
        origin: Point,
    },
    /// An element is being resized by the renderer's transform handles.
    Resizing {
        /// Id of the element being resized.
        id: ElementId,
        /// Element position when the resize began; a cancel puts the node back here.
        origin: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Id of the element the active gesture targets.
    #[must_use]
    pub fn target(&self) -> Option<&ElementId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(id),
        }
    }

    /// Target and starting position of the active gesture.
    #[must_use]
    pub fn origin(&self) -> Option<(&ElementId, Point)> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, origin } | Self::Resizing { id, origin } => Some((id, *origin)),
        }
    }
}
