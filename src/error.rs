//! Error types for the floor-plan crate.
//!
//! DESIGN
//! ======
//! One enum per boundary. `ValidationError` rejects a create/resize and
//! leaves the plan untouched. `LoadError` and `SaveError` come from the layout
//! store; a failed save never rolls back the in-memory plan.
//!
//! A missing element id is not an error: gestures and updates on a vanished
//! element are no-ops reported through `false`/`None` and a debug log line.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::model::ElementKind;

/// Stable machine-readable code for user-facing error surfaces.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind:?} needs a size")]
    MissingSize { kind: ElementKind },
    #[error("{kind:?} size must be positive, got {width} x {height}")]
    NonPositiveSize { kind: ElementKind, width: f64, height: f64 },
    #[error("room dimensions must be positive, got {width} x {height}")]
    InvalidRoomDimensions { width: f64, height: f64 },
    #[error("plan already has a room")]
    RoomExists,
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSize { .. } | Self::NonPositiveSize { .. } | Self::InvalidRoomDimensions { .. } => {
                "E_VALIDATION"
            }
            Self::RoomExists => "E_ROOM_EXISTS",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("layout decode failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "E_LAYOUT_DECODE",
            Self::Database(_) => "E_DATABASE",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("layout encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("layout store rejected the save: {0}")]
    Rejected(String),
}

impl SaveError {
    /// Short message for a transient failure notification.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Encode(_) => "The layout could not be saved. Your changes are still on screen.",
            Self::Database(_) | Self::Rejected(_) => {
                "Saving failed. Your changes are kept on this device; try saving again."
            }
        }
    }
}

impl ErrorCode for SaveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "E_LAYOUT_ENCODE",
            Self::Database(_) => "E_DATABASE",
            Self::Rejected(_) => "E_SAVE_FAILED",
        }
    }
}
