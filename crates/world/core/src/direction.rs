//! Eight-way compass directions and the adjacency math shared by every
//! position type.
use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::error::{ErrorSeverity, GridError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectionError {
    #[error("direction requested between identical positions")]
    IdenticalPositions,

    #[error("positions are not adjacent (dx: {dx}, dy: {dy})")]
    NotAdjacent { dx: i32, dy: i32 },

    #[error("direction number {0} is outside 1..=8")]
    InvalidNumber(u8),
}

impl GridError for DirectionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IdenticalPositions | Self::NotAdjacent { .. } => ErrorSeverity::Logic,
            Self::InvalidNumber(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IdenticalPositions => "DIRECTION_IDENTICAL_POSITIONS",
            Self::NotAdjacent { .. } => "DIRECTION_NOT_ADJACENT",
            Self::InvalidNumber(_) => "DIRECTION_INVALID_NUMBER",
        }
    }
}

/// Compass direction, numbered 1–8 clockwise from top.
///
/// The y axis grows downward, so `Top` is `(0, -1)`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum Direction {
    Top = 1,
    TopRight = 2,
    Right = 3,
    BottomRight = 4,
    Bottom = 5,
    BottomLeft = 6,
    Left = 7,
    TopLeft = 8,
}

impl Direction {
    /// Clockwise order starting at `Top`; position `i` holds number `i + 1`.
    pub const ALL: [Direction; 8] = [
        Direction::Top,
        Direction::TopRight,
        Direction::Right,
        Direction::BottomRight,
        Direction::Bottom,
        Direction::BottomLeft,
        Direction::Left,
        Direction::TopLeft,
    ];

    /// The 1-based number of this direction.
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    #[inline]
    const fn index(self) -> i32 {
        self as i32 - 1
    }

    #[inline]
    const fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(8) as usize]
    }

    /// Cell offset `(dx, dy)` of one step in this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Top => (0, -1),
            Direction::TopRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::BottomRight => (1, 1),
            Direction::Bottom => (0, 1),
            Direction::BottomLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::TopLeft => (-1, -1),
        }
    }

    /// Rotates by `steps` eighth-turns; positive is clockwise.
    #[inline]
    pub const fn rotate(self, steps: i32) -> Self {
        Self::from_index(self.index() + steps.rem_euclid(8))
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        self.rotate(4)
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.number() % 2 == 0
    }

    /// Resolves the direction of a single step `(dx, dy)`.
    ///
    /// Both components must lie in `-1..=1` and not both be zero.
    pub fn from_offset(dx: i32, dy: i32) -> Result<Self, DirectionError> {
        let direction = match (dx, dy) {
            (0, 0) => return Err(DirectionError::IdenticalPositions),
            (0, -1) => Direction::Top,
            (1, -1) => Direction::TopRight,
            (1, 0) => Direction::Right,
            (1, 1) => Direction::BottomRight,
            (0, 1) => Direction::Bottom,
            (-1, 1) => Direction::BottomLeft,
            (-1, 0) => Direction::Left,
            (-1, -1) => Direction::TopLeft,
            _ => return Err(DirectionError::NotAdjacent { dx, dy }),
        };
        Ok(direction)
    }
}

impl TryFrom<u8> for Direction {
    type Error = DirectionError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1..=8 => Ok(Self::ALL[usize::from(number) - 1]),
            _ => Err(DirectionError::InvalidNumber(number)),
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> u8 {
        direction.number()
    }
}

impl Add<i32> for Direction {
    type Output = Direction;
    fn add(self, rhs: i32) -> Direction {
        self.rotate(rhs)
    }
}

impl Sub<i32> for Direction {
    type Output = Direction;
    fn sub(self, rhs: i32) -> Direction {
        self.rotate(-rhs.rem_euclid(8))
    }
}

impl AddAssign<i32> for Direction {
    fn add_assign(&mut self, rhs: i32) {
        *self = *self + rhs;
    }
}

impl SubAssign<i32> for Direction {
    fn sub_assign(&mut self, rhs: i32) {
        *self = *self - rhs;
    }
}
