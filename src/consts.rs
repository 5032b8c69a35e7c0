//! Shared numeric constants for the floor-plan crate.

// ── Units ───────────────────────────────────────────────────────

/// Default projection density: 4 grid cells of 20 px each per meter.
pub const DEFAULT_PIXELS_PER_METER: f64 = 80.0;

/// On-screen size of one drawn grid cell, in pixels.
pub const DEFAULT_CELL_PIXELS: f64 = 20.0;

/// Default snap increment in meters (one grid cell).
pub const DEFAULT_GRID_QUANTUM: f64 = 0.25;

/// Fixed pixels-per-meter of layouts saved before the metric model existed.
pub const LEGACY_PIXELS_PER_METER: f64 = 80.0;

/// Smallest magnitude accepted as a divisor. Anything below is treated as this.
pub const MIN_DIVISOR: f64 = 1e-9;

// ── Viewport ────────────────────────────────────────────────────

/// Lower zoom bound for pinch gestures.
pub const PINCH_MIN_SCALE: f64 = 0.2;

/// Upper zoom bound for pinch gestures.
pub const PINCH_MAX_SCALE: f64 = 2.0;

/// Smallest scale auto-fit will ever pick.
pub const FIT_MIN_SCALE: f64 = 0.1;

/// Auto-fit never zooms in past this when framing a loaded layout.
pub const FIT_EXISTING_MAX_SCALE: f64 = 1.0;

/// Auto-fit zoom ceiling when framing a freshly created room.
pub const FIT_NEW_ROOM_MAX_SCALE: f64 = 1.5;

/// Padding added to the content extent when fitting a loaded layout, in pixels.
pub const FIT_EXISTING_PADDING_PX: f64 = 20.0;

/// Left gutter used by the left-aligned fit mode, in pixels.
pub const FIT_LEFT_GUTTER_PX: f64 = 20.0;

/// Padding added to the content extent when fitting a new room, in pixels.
pub const FIT_NEW_ROOM_PADDING_PX: f64 = 40.0;

// ── Room creation ───────────────────────────────────────────────

/// Free cells kept around a new room on every side.
pub const ROOM_MARGIN_CELLS: f64 = 3.0;

/// A new room never renders denser than the standard 4 cells per meter.
pub const MAX_ROOM_PIXELS_PER_METER: f64 = 80.0;

/// Floor for the room density so huge rooms still produce a usable scale.
pub const MIN_ROOM_PIXELS_PER_METER: f64 = 0.5;

// ── Element defaults ────────────────────────────────────────────

/// Where new elements are dropped before the user moves them, in meters.
pub const DEFAULT_PLACEMENT_M: f64 = 1.25;

/// Default long-axis length of tables, walls and doors, in meters.
pub const DEFAULT_ELEMENT_LENGTH_M: f64 = 1.0;

/// Default font size for free-standing labels, in meters.
pub const DEFAULT_LABEL_FONT_SIZE_M: f64 = 0.2;

// ── Rendering ───────────────────────────────────────────────────

/// Extra grid cells drawn beyond each edge of the visible rect.
pub const GRID_LINE_BUFFER_CELLS: f64 = 5.0;

/// Hard cap on grid lines per axis; beyond this the grid is not drawn.
pub const MAX_GRID_LINES: usize = 4096;
