//! Floor-plan configuration, with optional overrides from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use tracing::warn;

use crate::consts::{
    DEFAULT_CELL_PIXELS, DEFAULT_GRID_QUANTUM, DEFAULT_PIXELS_PER_METER, LEGACY_PIXELS_PER_METER,
    MAX_ROOM_PIXELS_PER_METER, MIN_ROOM_PIXELS_PER_METER, PINCH_MAX_SCALE, PINCH_MIN_SCALE, ROOM_MARGIN_CELLS,
};
use crate::door::DoorSolver;
use crate::grid::GridSnapper;
use crate::transform::{RotationSnap, TransformController};
use crate::viewport::{FitOptions, PinchZoom};

#[derive(Debug, Clone, PartialEq)]
pub struct FloorPlanConfig {
    /// Density used when no container size is known.
    pub pixels_per_meter: f64,
    /// Snap increment in meters. Also the wall thickness.
    pub grid_quantum: f64,
    /// On-screen size of one grid cell.
    pub cell_pixels: f64,
    /// Scale of pre-metric layouts.
    pub legacy_pixels_per_meter: f64,
    pub pinch_min_scale: f64,
    pub pinch_max_scale: f64,
    pub fit_existing: FitOptions,
    pub fit_new_room: FitOptions,
    pub rotation_snap: RotationSnap,
    /// Free cells around a new room on every side.
    pub room_margin_cells: f64,
    pub min_room_pixels_per_meter: f64,
    pub max_room_pixels_per_meter: f64,
}

impl Default for FloorPlanConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            grid_quantum: DEFAULT_GRID_QUANTUM,
            cell_pixels: DEFAULT_CELL_PIXELS,
            legacy_pixels_per_meter: LEGACY_PIXELS_PER_METER,
            pinch_min_scale: PINCH_MIN_SCALE,
            pinch_max_scale: PINCH_MAX_SCALE,
            fit_existing: FitOptions::existing_layout(),
            fit_new_room: FitOptions::new_room(),
            rotation_snap: RotationSnap::PreserveCenter,
            room_margin_cells: ROOM_MARGIN_CELLS,
            min_room_pixels_per_meter: MIN_ROOM_PIXELS_PER_METER,
            max_room_pixels_per_meter: MAX_ROOM_PIXELS_PER_METER,
        }
    }
}

impl FloorPlanConfig {
    /// Defaults overridden by environment variables.
    ///
    /// Optional:
    /// - `FLOORPLAN_PIXELS_PER_METER`: default 80
    /// - `FLOORPLAN_GRID_QUANTUM`: default 0.25
    /// - `FLOORPLAN_CELL_PIXELS`: default 20
    /// - `FLOORPLAN_LEGACY_PPM`: default 80
    /// - `FLOORPLAN_PINCH_MIN` / `FLOORPLAN_PINCH_MAX`: default 0.2 / 2.0
    /// - `FLOORPLAN_ROTATION_SNAP`: `center` (default) or `corner`
    ///
    /// Malformed values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            pixels_per_meter: env_positive("FLOORPLAN_PIXELS_PER_METER", defaults.pixels_per_meter),
            grid_quantum: env_positive("FLOORPLAN_GRID_QUANTUM", defaults.grid_quantum),
            cell_pixels: env_positive("FLOORPLAN_CELL_PIXELS", defaults.cell_pixels),
            legacy_pixels_per_meter: env_positive("FLOORPLAN_LEGACY_PPM", defaults.legacy_pixels_per_meter),
            pinch_min_scale: env_positive("FLOORPLAN_PINCH_MIN", defaults.pinch_min_scale),
            pinch_max_scale: env_positive("FLOORPLAN_PINCH_MAX", defaults.pinch_max_scale),
            rotation_snap: parse_rotation_snap(std::env::var("FLOORPLAN_ROTATION_SNAP").as_deref().unwrap_or("center")),
            ..defaults
        }
    }

    #[must_use]
    pub fn snapper(&self) -> GridSnapper {
        GridSnapper::new(self.grid_quantum)
    }

    /// Wall thickness equals one grid quantum.
    #[must_use]
    pub fn wall_thickness(&self) -> f64 {
        self.snapper().quantum()
    }

    #[must_use]
    pub fn door_solver(&self) -> DoorSolver {
        DoorSolver::new(self.wall_thickness())
    }

    #[must_use]
    pub fn transform_controller(&self) -> TransformController {
        TransformController::new(self.snapper(), self.door_solver(), self.rotation_snap)
    }

    #[must_use]
    pub fn pinch_zoom(&self) -> PinchZoom {
        PinchZoom::new(self.pinch_min_scale, self.pinch_max_scale)
    }
}

/// Parse `key` as a value of `T`, or return `default` when unset or malformed.
pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "ignoring malformed config value");
            default
        }
    }
}

fn env_positive(key: &str, default: f64) -> f64 {
    let value = env_parse(key, default);
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(key, value, "ignoring non-positive config value");
        default
    }
}

fn parse_rotation_snap(raw: &str) -> RotationSnap {
    match raw {
        "corner" => RotationSnap::GridCorner,
        "center" => RotationSnap::PreserveCenter,
        other => {
            warn!(value = other, "unknown FLOORPLAN_ROTATION_SNAP, using center");
            RotationSnap::PreserveCenter
        }
    }
}
