//! Geometry core for a restaurant floor-plan editor.
//!
//! Everything a restaurant's dining room is made of (the room outline, walls,
//! doors, tables, counters, text labels) is stored in meters. Pixels exist
//! only at the edges: the host renderer asks for a [`render::scene`], and
//! gesture results come back in pixels to be projected, snapped, and written
//! into the metric plan. The same crate also owns the persisted layout format
//! and the one-time migration of pre-metric layouts.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Headless editor [`engine::EditorCore`] returning [`engine::Action`]s |
//! | [`model`] | Elements, rotation, bounding boxes, and the [`model::Plan`] store |
//! | [`projection`] | Metric/pixel conversion and the zoomable [`projection::Viewport`] |
//! | [`grid`] | Grid snapping in meters |
//! | [`door`] | Gluing doors to the nearest room wall |
//! | [`transform`] | Drag, resize, and rotate endings |
//! | [`viewport`] | Auto-fit framing and pinch zoom |
//! | [`input`] | Gesture results and the gesture state machine |
//! | [`hit`] | Hit-testing in meters |
//! | [`render`] | Pixel scene and grid lines for the host renderer |
//! | [`occupancy`] | Table lookups and the free/occupied overlay |
//! | [`schedule`] | Debounced refit scheduling |
//! | [`layout`] | Persisted layout record and legacy migration |
//! | [`store`] | Async layout store with memory and Postgres backends |
//! | [`db`] | Postgres pool and migrations |
//! | [`config`] | Configuration with environment overrides |
//! | [`error`] | Error enums and stable error codes |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod db;
pub mod door;
pub mod engine;
pub mod error;
pub mod grid;
pub mod hit;
pub mod input;
pub mod layout;
pub mod model;
pub mod occupancy;
pub mod projection;
pub mod render;
pub mod schedule;
pub mod store;
pub mod transform;
pub mod viewport;
