//! Coordinate math and per-room spatial storage for a room-partitioned grid world.
//!
//! `world-core` models the world at three scales: [`LocalPosition`] for a cell
//! inside one 50×50 room, [`GlobalPosition`] for a cell tagged with its
//! [`RoomCoordinate`], and [`WorldPosition`] for the flat grid spanning every
//! room. All conversions between them are pure functions. Per-cell data lives
//! in bit-packed [`LocalMatrix`] values, with [`TerrainMatrix`] and
//! [`CostMatrix`] as the layouts shared with pathfinders.
//!
//! The crate performs no I/O and never logs; the only stateful consumer is the
//! terrain cache in `world-cache`.
pub mod config;
pub mod direction;
pub mod error;
pub mod matrix;
pub mod position;
pub mod room;
pub mod terrain;

pub use config::{GridConfig, PathCosts};
pub use direction::{Direction, DirectionError};
pub use error::{ErrorSeverity, GridError};
pub use matrix::{BitMatrix, ByteMatrix, LocalMatrix, MatrixError, StorageWord};
pub use position::{
    Area, Edges, GlobalPosition, LocalPosition, Neighbors, PositionError, WithRange,
    WorldPosition, path_directions,
};
pub use room::{RoomCoordinate, RoomNameError};
pub use terrain::{
    CostMatrix, CostMatrixSource, RoomCosts, StaticCosts, StaticTerrain, Terrain, TerrainError,
    TerrainMatrix, TerrainSource,
};
