//! Position types at the three scales of the world: a cell inside a room,
//! a cell tagged with its room, and a cell on the flat world grid.
mod edges;
mod global;
mod iter;
mod local;
mod world;

pub use edges::Edges;
pub use global::{GlobalPosition, path_directions};
pub use iter::{Area, Neighbors, WithRange};
pub use local::LocalPosition;
pub use world::WorldPosition;

use crate::error::{ErrorSeverity, GridError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionError {
    #[error("({x}, {y}) is outside the room")]
    OutOfRoom { x: i32, y: i32 },

    #[error("({x}, {y}) is outside the world")]
    OutOfWorld { x: u32, y: u32 },

    #[error("corner {bottom_right} is above or left of corner {top_left}")]
    InvalidCorners {
        top_left: LocalPosition,
        bottom_right: LocalPosition,
    },
}

impl GridError for PositionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRoom { .. } => "POSITION_OUT_OF_ROOM",
            Self::OutOfWorld { .. } => "POSITION_OUT_OF_WORLD",
            Self::InvalidCorners { .. } => "POSITION_INVALID_CORNERS",
        }
    }
}
