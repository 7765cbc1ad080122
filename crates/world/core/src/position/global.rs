use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::direction::{Direction, DirectionError};
use crate::room::RoomCoordinate;

use super::PositionError;
use super::local::LocalPosition;
use super::world::WorldPosition;

/// A cell tagged with the room it belongs to.
///
/// Packs to 32 bits as `local | room << 16`; equality, ordering and hashing
/// use that value, so positions sort by room first.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "u32", try_from = "u32")
)]
pub struct GlobalPosition {
    room: RoomCoordinate,
    local: LocalPosition,
}

impl GlobalPosition {
    #[inline]
    pub const fn new(room: RoomCoordinate, local: LocalPosition) -> Self {
        Self { room, local }
    }

    #[inline]
    pub const fn room(self) -> RoomCoordinate {
        self.room
    }

    #[inline]
    pub const fn local(self) -> LocalPosition {
        self.local
    }

    #[inline]
    pub const fn packed(self) -> u32 {
        self.local.packed() as u32 | (self.room.packed() as u32) << 16
    }

    /// Rebuilds a position from [`GlobalPosition::packed`], validating the
    /// local half.
    pub fn from_packed(packed: u32) -> Result<Self, PositionError> {
        let local = LocalPosition::from_packed(packed as u16)?;
        let room = RoomCoordinate::from_packed((packed >> 16) as u16);
        Ok(Self::new(room, local))
    }

    /// One step along `direction`, entering the adjacent room when the step
    /// crosses a border; `None` past the world edge or into the null room.
    pub fn in_direction(self, direction: Direction) -> Option<Self> {
        if let Some(local) = self.local.in_direction(direction) {
            return Some(Self::new(self.room, local));
        }
        WorldPosition::from(self)
            .in_direction(direction)
            .map(Self::from)
            .filter(|position| !position.room.is_null())
    }

    /// Direction of the single step to an adjacent position, across room
    /// borders if needed.
    pub fn direction_to(self, other: Self) -> Result<Direction, DirectionError> {
        if self.room == other.room {
            return self.local.direction_to(other.local);
        }
        WorldPosition::from(self).direction_to(WorldPosition::from(other))
    }

    /// Chebyshev distance in cells over the whole world.
    pub fn distance_to(self, other: Self) -> u32 {
        if self.room == other.room {
            return u32::from(self.local.distance_to(other.local));
        }
        WorldPosition::from(self).distance_to(WorldPosition::from(other))
    }

    #[inline]
    pub fn is_near_to(self, other: Self) -> bool {
        self.distance_to(other) <= 1
    }

    /// All eight adjacent positions, crossing into neighboring rooms; steps
    /// past the world edge or into the null room are dropped.
    pub fn neighbors(self) -> impl Iterator<Item = GlobalPosition> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.in_direction(direction))
    }
}

/// Converts a path of consecutive positions into the step directions between
/// them.
///
/// Every pair of consecutive positions must be adjacent; paths with fewer than
/// two positions yield no steps.
pub fn path_directions(path: &[GlobalPosition]) -> Result<Vec<Direction>, DirectionError> {
    path.windows(2)
        .map(|step| step[0].direction_to(step[1]))
        .collect()
}

impl PartialEq for GlobalPosition {
    fn eq(&self, other: &Self) -> bool {
        self.packed() == other.packed()
    }
}

impl Eq for GlobalPosition {}

impl PartialOrd for GlobalPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GlobalPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.packed().cmp(&other.packed())
    }
}

impl Hash for GlobalPosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.packed());
    }
}

impl From<GlobalPosition> for u32 {
    fn from(position: GlobalPosition) -> u32 {
        position.packed()
    }
}

impl TryFrom<u32> for GlobalPosition {
    type Error = PositionError;

    fn try_from(packed: u32) -> Result<Self, Self::Error> {
        Self::from_packed(packed)
    }
}

impl fmt::Display for GlobalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}, {}]", self.room, self.local.x(), self.local.y())
    }
}
