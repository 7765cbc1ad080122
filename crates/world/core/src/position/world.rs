use core::fmt;

use crate::config::GridConfig;
use crate::direction::{Direction, DirectionError};
use crate::room::RoomCoordinate;

use super::PositionError;
use super::global::GlobalPosition;
use super::local::LocalPosition;

/// A cell on the flat world grid, ignoring room boundaries.
///
/// Each axis is `(room_axis + 128) * 50 + local_axis`, so the world spans
/// `0..12800` cells per axis and room borders are ordinary unit steps. The
/// grid is complete, so it also covers the cells of [`RoomCoordinate::NULL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPosition {
    x: u16,
    y: u16,
}

impl WorldPosition {
    pub fn new(x: u16, y: u16) -> Result<Self, PositionError> {
        Self::checked(i32::from(x), i32::from(y)).ok_or(PositionError::OutOfWorld {
            x: u32::from(x),
            y: u32::from(y),
        })
    }

    fn checked(x: i32, y: i32) -> Option<Self> {
        let cells = i32::from(GridConfig::WORLD_CELLS);
        if (0..cells).contains(&x) && (0..cells).contains(&y) {
            Some(Self {
                x: x as u16,
                y: y as u16,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn x(self) -> u16 {
        self.x
    }

    #[inline]
    pub const fn y(self) -> u16 {
        self.y
    }

    pub fn room(self) -> RoomCoordinate {
        let size = u16::from(GridConfig::ROOM_SIZE);
        RoomCoordinate::from_world_index((self.x / size) as u8, (self.y / size) as u8)
    }

    pub fn local(self) -> LocalPosition {
        let size = u16::from(GridConfig::ROOM_SIZE);
        LocalPosition::raw((self.x % size) as u8, (self.y % size) as u8)
    }

    /// One step along `direction`; `None` past the world edge.
    pub fn in_direction(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        Self::checked(i32::from(self.x) + dx, i32::from(self.y) + dy)
    }

    pub fn direction_to(self, other: Self) -> Result<Direction, DirectionError> {
        Direction::from_offset(
            i32::from(other.x) - i32::from(self.x),
            i32::from(other.y) - i32::from(self.y),
        )
    }

    /// Chebyshev distance in cells.
    pub fn distance_to(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        u32::from(dx.max(dy))
    }
}

impl From<GlobalPosition> for WorldPosition {
    fn from(position: GlobalPosition) -> Self {
        let size = u16::from(GridConfig::ROOM_SIZE);
        let room = position.room();
        let local = position.local();
        Self {
            x: u16::from(room.world_x()) * size + u16::from(local.x()),
            y: u16::from(room.world_y()) * size + u16::from(local.y()),
        }
    }
}

impl From<WorldPosition> for GlobalPosition {
    fn from(position: WorldPosition) -> Self {
        GlobalPosition::new(position.room(), position.local())
    }
}

impl fmt::Display for WorldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.x, self.y)
    }
}
