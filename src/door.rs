//! Door-to-wall constraint solver.
//!
//! DESIGN
//! ======
//! A room's rectangle lies on its wall centerlines, so each side is a 1-D
//! segment. When a door is dropped, the solver finds the segment nearest to
//! the drop point, clamps the door along it so the whole door stays inside the
//! span, and turns the door to lie flush with that wall.
//!
//! Ties on distance go to the first side in [`WallSide::ALL`] order
//! (top, bottom, left, right). A door dropped at the exact center of a square
//! room therefore lands on the top wall.
//!
//! When the wall is shorter than the door the usable range is empty; the door
//! then sits at the wall start rather than overhanging the other corner.

#[cfg(test)]
#[path = "door_test.rs"]
mod door_test;

use tracing::debug;

use crate::model::{Element, Rotation};
use crate::projection::Point;

/// One side of the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl WallSide {
    /// Declaration order; also the tie-break order.
    pub const ALL: [WallSide; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// A wall as a 1-D interval. Horizontal walls sit at `y = offset` and span
/// `x ∈ [start, end]`; vertical walls sit at `x = offset` and span `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub side: WallSide,
    pub offset: f64,
    pub start: f64,
    pub end: f64,
}

impl WallSegment {
    #[must_use]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Point on the segment nearest to `p`.
    #[must_use]
    pub fn closest_point(&self, p: Point) -> Point {
        if self.side.is_horizontal() {
            Point::new(p.x.clamp(self.start, self.end), self.offset)
        } else {
            Point::new(self.offset, p.y.clamp(self.start, self.end))
        }
    }

    #[must_use]
    pub fn distance_to(&self, p: Point) -> f64 {
        p.distance_to(self.closest_point(p))
    }
}

/// The four sides of `room`'s visual footprint, in [`WallSide::ALL`] order.
///
/// A rotated room's walls follow its rotated bounds, so they agree with what
/// is drawn and hit-tested. Segments always have `start <= end`, even for a
/// room stored with a negative size.
#[must_use]
pub fn wall_segments(room: &Element) -> [WallSegment; 4] {
    let b = room.bounds();
    let (left, right) = (b.min_x.min(b.max_x), b.min_x.max(b.max_x));
    let (top, bottom) = (b.min_y.min(b.max_y), b.min_y.max(b.max_y));
    WallSide::ALL.map(|side| match side {
        WallSide::Top => WallSegment { side, offset: top, start: left, end: right },
        WallSide::Bottom => WallSegment { side, offset: bottom, start: left, end: right },
        WallSide::Left => WallSegment { side, offset: left, start: top, end: bottom },
        WallSide::Right => WallSegment { side, offset: right, start: top, end: bottom },
    })
}

/// The wall nearest to `p`; earlier sides win ties.
#[must_use]
pub fn nearest_wall(walls: &[WallSegment; 4], p: Point) -> WallSegment {
    let mut best = walls[0];
    let mut best_dist = best.distance_to(p);
    for wall in &walls[1..] {
        let dist = wall.distance_to(p);
        if dist < best_dist {
            best = *wall;
            best_dist = dist;
        }
    }
    best
}

/// Where the solver put the door.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorPlacement {
    pub position: Point,
    pub rotation: Rotation,
    pub wall: WallSide,
}

/// Glues doors to the nearest room wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorSolver {
    wall_thickness: f64,
}

impl DoorSolver {
    #[must_use]
    pub fn new(wall_thickness: f64) -> Self {
        Self { wall_thickness: wall_thickness.max(0.0) }
    }

    #[must_use]
    pub fn wall_thickness(&self) -> f64 {
        self.wall_thickness
    }

    /// Place a door of `door_length` dropped with its pivot at `target`.
    ///
    /// Horizontal walls give a 0° door shifted up by half the wall thickness;
    /// vertical walls give a 90° door shifted right by half the thickness, so
    /// that with the pivot-based rotation its footprint straddles the centerline.
    #[must_use]
    pub fn solve(&self, target: Point, door_length: f64, room: &Element) -> DoorPlacement {
        let wall = nearest_wall(&wall_segments(room), target);
        self.place_on(wall, target, usable_length(door_length))
    }

    /// Place a door whose footprint is currently centered on `center`.
    ///
    /// The wall is chosen by the center rather than the pivot, so a door that
    /// already sits at the corner end of a wall stays on that wall.
    #[must_use]
    pub fn solve_centered(&self, center: Point, door_length: f64, room: &Element) -> DoorPlacement {
        let length = usable_length(door_length);
        let wall = nearest_wall(&wall_segments(room), center);
        let start = Point::new(center.x - length / 2.0, center.y - length / 2.0);
        self.place_on(wall, start, length)
    }

    /// Put a door of `length` on `wall` with its leading edge at `start`.
    fn place_on(&self, wall: WallSegment, start: Point, length: f64) -> DoorPlacement {
        let half = self.wall_thickness / 2.0;
        let placement = if wall.side.is_horizontal() {
            DoorPlacement {
                position: Point::new(clamp_along(start.x, wall.start, wall.end - length), wall.offset - half),
                rotation: Rotation::Deg0,
                wall: wall.side,
            }
        } else {
            DoorPlacement {
                position: Point::new(wall.offset + half, clamp_along(start.y, wall.start, wall.end - length)),
                rotation: Rotation::Deg90,
                wall: wall.side,
            }
        };
        debug!(wall = ?placement.wall, x = placement.position.x, y = placement.position.y, "door snapped to wall");
        placement
    }
}

fn usable_length(door_length: f64) -> f64 {
    if door_length.is_finite() { door_length.max(0.0) } else { 0.0 }
}

/// Clamp into `[lo, hi]`, falling back to `lo` when the range is empty or the
/// value is not finite.
fn clamp_along(value: f64, lo: f64, hi: f64) -> f64 {
    if !value.is_finite() || hi < lo {
        return lo;
    }
    value.clamp(lo, hi)
}
