use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::config::GridConfig;
use crate::direction::{Direction, DirectionError};

use super::edges::Edges;
use super::iter::{Area, Neighbors, WithRange};
use super::PositionError;

/// A cell inside one room's 50×50 grid.
///
/// Both axes are always in `0..=49`; constructors reject anything else.
/// Equality, ordering and hashing use [`LocalPosition::packed`].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "u16", try_from = "u16")
)]
pub struct LocalPosition {
    x: u8,
    y: u8,
}

impl LocalPosition {
    pub const ORIGIN: Self = Self::raw(0, 0);

    /// Validates and builds a position.
    pub fn new(x: u8, y: u8) -> Result<Self, PositionError> {
        if x > GridConfig::ROOM_MAX || y > GridConfig::ROOM_MAX {
            return Err(PositionError::OutOfRoom {
                x: i32::from(x),
                y: i32::from(y),
            });
        }
        Ok(Self::raw(x, y))
    }

    /// Like [`LocalPosition::new`] for signed coordinates, e.g. after offset math.
    pub fn from_signed(x: i32, y: i32) -> Result<Self, PositionError> {
        Self::checked(x, y).ok_or(PositionError::OutOfRoom { x, y })
    }

    #[inline]
    pub(crate) const fn raw(x: u8, y: u8) -> Self {
        debug_assert!(x <= GridConfig::ROOM_MAX && y <= GridConfig::ROOM_MAX);
        Self { x, y }
    }

    #[inline]
    pub(crate) fn checked(x: i32, y: i32) -> Option<Self> {
        let max = i32::from(GridConfig::ROOM_MAX);
        if (0..=max).contains(&x) && (0..=max).contains(&y) {
            Some(Self::raw(x as u8, y as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn x(self) -> u8 {
        self.x
    }

    #[inline]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// 16-bit view: `x` in the low byte, `y` in the high byte.
    #[inline]
    pub const fn packed(self) -> u16 {
        self.x as u16 | (self.y as u16) << 8
    }

    pub fn from_packed(packed: u16) -> Result<Self, PositionError> {
        Self::new(packed as u8, (packed >> 8) as u8)
    }

    /// Matrix index of this cell (`x * 50 + y`).
    #[inline]
    pub const fn index(self) -> usize {
        self.x as usize * GridConfig::ROOM_SIZE as usize + self.y as usize
    }

    /// Inverse of [`LocalPosition::index`]; `None` for indices past the room.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= GridConfig::ROOM_AREA {
            return None;
        }
        let size = usize::from(GridConfig::ROOM_SIZE);
        Some(Self::raw((index / size) as u8, (index % size) as u8))
    }

    /// Shifts the position, or `None` if the result leaves the room.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Self::checked(i32::from(self.x) + dx, i32::from(self.y) + dy)
    }

    /// The neighbor one step along `direction`, or `None` past the room edge.
    #[inline]
    pub fn in_direction(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        self.offset(dx, dy)
    }

    /// Direction of the single step from `self` to an adjacent `other`.
    pub fn direction_to(self, other: Self) -> Result<Direction, DirectionError> {
        Direction::from_offset(
            i32::from(other.x) - i32::from(self.x),
            i32::from(other.y) - i32::from(self.y),
        )
    }

    /// Chebyshev distance.
    pub fn distance_to(self, other: Self) -> u8 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    #[inline]
    pub fn is_near_to(self, other: Self) -> bool {
        self.distance_to(other) <= 1
    }

    /// Number of steps to the closest room border (0 on the border).
    pub fn range_to_edge(self) -> u8 {
        let max = GridConfig::ROOM_MAX;
        self.x.min(max - self.x).min(self.y).min(max - self.y)
    }

    /// Borders this cell lies on.
    #[inline]
    pub const fn edges(self) -> Edges {
        Edges::of_cell(self.x, self.y)
    }

    #[inline]
    pub const fn is_on_edge(self) -> bool {
        !self.edges().is_empty()
    }

    /// Directions whose neighbor stays inside the room.
    pub fn neighbor_directions(self) -> &'static [Direction] {
        self.edges().neighbor_directions()
    }

    /// Adjacent cells inside the room: 3 at a corner, 5 on a side, 8 elsewhere.
    pub fn neighbors(self) -> Neighbors {
        Neighbors::new(self, self.neighbor_directions())
    }

    /// Cells inside the room at exactly `range` (Chebyshev) from this one.
    ///
    /// `with_range(0)` yields this position alone.
    pub fn with_range(self, range: u32) -> WithRange {
        WithRange::new(self, range)
    }

    /// The square of cells within `range`, clipped to the room.
    pub fn within_range(self, range: u32) -> Area {
        let (left, right) = clip_axis(self.x, range);
        let (top, bottom) = clip_axis(self.y, range);
        Area::from_bounds(left, top, right, bottom)
    }

    /// Cells within `range` of this position and of every position in `others`.
    ///
    /// The result is empty when the squares do not overlap.
    pub fn within_range_of_all<I>(self, range: u32, others: I) -> Area
    where
        I: IntoIterator<Item = LocalPosition>,
    {
        let (mut left, mut right) = clip_axis(self.x, range);
        let (mut top, mut bottom) = clip_axis(self.y, range);
        for other in others {
            let (other_left, other_right) = clip_axis(other.x, range);
            let (other_top, other_bottom) = clip_axis(other.y, range);
            left = left.max(other_left);
            right = right.min(other_right);
            top = top.max(other_top);
            bottom = bottom.min(other_bottom);
        }
        Area::from_bounds(left, top, right, bottom)
    }

    /// Every cell in the room, row-major.
    pub fn all() -> Area {
        Area::from_bounds(0, 0, GridConfig::ROOM_MAX, GridConfig::ROOM_MAX)
    }

    /// Cells of the rectangle spanned by two inclusive corners, row-major.
    pub fn area(top_left: Self, bottom_right: Self) -> Result<Area, PositionError> {
        if bottom_right.x < top_left.x || bottom_right.y < top_left.y {
            return Err(PositionError::InvalidCorners {
                top_left,
                bottom_right,
            });
        }
        Ok(Area::from_bounds(
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
        ))
    }
}

/// `[value - range, value + range]` clipped to `0..=49`.
fn clip_axis(value: u8, range: u32) -> (u8, u8) {
    let low = u32::from(value).saturating_sub(range) as u8;
    let high = u32::from(value)
        .saturating_add(range)
        .min(u32::from(GridConfig::ROOM_MAX)) as u8;
    (low, high)
}

impl Default for LocalPosition {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl PartialEq for LocalPosition {
    fn eq(&self, other: &Self) -> bool {
        self.packed() == other.packed()
    }
}

impl Eq for LocalPosition {}

impl PartialOrd for LocalPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocalPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.packed().cmp(&other.packed())
    }
}

impl Hash for LocalPosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u16(self.packed());
    }
}

impl From<LocalPosition> for u16 {
    fn from(position: LocalPosition) -> u16 {
        position.packed()
    }
}

impl TryFrom<u16> for LocalPosition {
    type Error = PositionError;

    fn try_from(packed: u16) -> Result<Self, Self::Error> {
        Self::from_packed(packed)
    }
}

impl fmt::Display for LocalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
