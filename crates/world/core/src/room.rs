//! Room identifiers: `"W3N5"`-style names and their packed 16-bit form.
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use crate::config::GridConfig;
use crate::direction::Direction;
use crate::error::{ErrorSeverity, GridError};
use crate::position::{GlobalPosition, LocalPosition, WorldPosition};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoomNameError {
    #[error("invalid room name format")]
    InvalidFormat,

    #[error("room distance {distance} exceeds {max}", max = GridConfig::MAX_ROOM_DISTANCE)]
    OutOfRange { distance: u32 },

    #[error("room name aliases the reserved room {reserved}")]
    Reserved { reserved: RoomCoordinate },
}

impl GridError for RoomNameError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "ROOM_NAME_INVALID_FORMAT",
            Self::OutOfRange { .. } => "ROOM_NAME_OUT_OF_RANGE",
            Self::Reserved { .. } => "ROOM_NAME_RESERVED",
        }
    }
}

/// Location of a room as signed offsets from the world center.
///
/// `"E0S0"` is `(0, 0)` and `"W0N0"` is `(-1, -1)`. Equality, ordering and
/// hashing all go through [`RoomCoordinate::packed`].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "u16", from = "u16")
)]
pub struct RoomCoordinate {
    xx: i8,
    yy: i8,
}

impl RoomCoordinate {
    /// The simulation room, named `"sim"`.
    pub const SIM: Self = Self::new(i8::MIN, i8::MIN);

    /// Marks "no room", e.g. for something that is not currently placed.
    pub const NULL: Self = Self::new(i8::MIN, i8::MAX);

    #[inline]
    pub const fn new(xx: i8, yy: i8) -> Self {
        Self { xx, yy }
    }

    /// Builds a room from unsigned world indices (`0..256` per axis).
    #[inline]
    pub const fn from_world_index(x: u8, y: u8) -> Self {
        Self::new(
            x.wrapping_sub(GridConfig::WORLD_HALF) as i8,
            y.wrapping_sub(GridConfig::WORLD_HALF) as i8,
        )
    }

    #[inline]
    pub const fn xx(self) -> i8 {
        self.xx
    }

    #[inline]
    pub const fn yy(self) -> i8 {
        self.yy
    }

    /// Unsigned world index of the horizontal axis (`xx + 128`).
    #[inline]
    pub const fn world_x(self) -> u8 {
        (self.xx as u8).wrapping_add(GridConfig::WORLD_HALF)
    }

    /// Unsigned world index of the vertical axis (`yy + 128`).
    #[inline]
    pub const fn world_y(self) -> u8 {
        (self.yy as u8).wrapping_add(GridConfig::WORLD_HALF)
    }

    /// 16-bit view: `xx` in the low byte, `yy` in the high byte.
    #[inline]
    pub const fn packed(self) -> u16 {
        (self.xx as u8 as u16) | ((self.yy as u8 as u16) << 8)
    }

    #[inline]
    pub const fn from_packed(packed: u16) -> Self {
        Self::new(packed as u8 as i8, (packed >> 8) as u8 as i8)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.packed() == Self::NULL.packed()
    }

    #[inline]
    pub const fn is_sim(self) -> bool {
        self.packed() == Self::SIM.packed()
    }

    /// Position of `local` inside this room.
    #[inline]
    pub const fn at(self, local: LocalPosition) -> GlobalPosition {
        GlobalPosition::new(self, local)
    }

    /// World position of this room's `(0, 0)` cell.
    pub fn world_origin(self) -> WorldPosition {
        WorldPosition::from(self.at(LocalPosition::ORIGIN))
    }

    /// The adjacent room one step along `direction`.
    ///
    /// `None` past the world edge and for the [`RoomCoordinate::NULL`] slot in
    /// the south-west corner. The [`RoomCoordinate::SIM`] slot in the
    /// north-west corner is an ordinary room and can be stepped into.
    pub fn in_direction(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        let xx = i8::try_from(i32::from(self.xx) + dx).ok()?;
        let yy = i8::try_from(i32::from(self.yy) + dy).ok()?;
        Some(Self::new(xx, yy)).filter(|room| !room.is_null())
    }

    /// Chebyshev distance in rooms.
    pub fn distance_to(self, other: Self) -> u32 {
        let dx = (i32::from(self.xx) - i32::from(other.xx)).unsigned_abs();
        let dy = (i32::from(self.yy) - i32::from(other.yy)).unsigned_abs();
        dx.max(dy)
    }

    /// Parses a room name: `"sim"` or `[WE]<n>[NS]<n>`.
    pub fn parse(name: &str) -> Result<Self, RoomNameError> {
        if name == "sim" {
            return Ok(Self::SIM);
        }

        let bytes = name.as_bytes();
        let (&horizontal, rest) = bytes.split_first().ok_or(RoomNameError::InvalidFormat)?;
        let (x_distance, rest) = parse_distance(rest)?;
        let (&vertical, rest) = rest.split_first().ok_or(RoomNameError::InvalidFormat)?;
        let (y_distance, rest) = parse_distance(rest)?;
        if !rest.is_empty() {
            return Err(RoomNameError::InvalidFormat);
        }

        let xx = match horizontal {
            b'W' => -x_distance - 1,
            b'E' => x_distance,
            _ => return Err(RoomNameError::InvalidFormat),
        };
        let yy = match vertical {
            b'N' => -y_distance - 1,
            b'S' => y_distance,
            _ => return Err(RoomNameError::InvalidFormat),
        };

        // Distances are bounded by MAX_ROOM_DISTANCE so both axes fit in i8.
        let room = Self::new(xx as i8, yy as i8);
        if room.is_sim() || room.is_null() {
            return Err(RoomNameError::Reserved { reserved: room });
        }
        Ok(room)
    }
}

/// Splits a leading run of ASCII digits off `bytes` and bounds it by
/// [`GridConfig::MAX_ROOM_DISTANCE`].
fn parse_distance(bytes: &[u8]) -> Result<(i16, &[u8]), RoomNameError> {
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return Err(RoomNameError::InvalidFormat);
    }

    let mut distance: u32 = 0;
    for &digit in &bytes[..digits] {
        distance = distance
            .saturating_mul(10)
            .saturating_add(u32::from(digit - b'0'));
    }
    if distance > u32::from(GridConfig::MAX_ROOM_DISTANCE) {
        return Err(RoomNameError::OutOfRange { distance });
    }
    Ok((distance as i16, &bytes[digits..]))
}

impl Default for RoomCoordinate {
    fn default() -> Self {
        Self::NULL
    }
}

impl PartialEq for RoomCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.packed() == other.packed()
    }
}

impl Eq for RoomCoordinate {}

impl PartialOrd for RoomCoordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RoomCoordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.packed().cmp(&other.packed())
    }
}

impl Hash for RoomCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u16(self.packed());
    }
}

impl From<u16> for RoomCoordinate {
    fn from(packed: u16) -> Self {
        Self::from_packed(packed)
    }
}

impl From<RoomCoordinate> for u16 {
    fn from(room: RoomCoordinate) -> u16 {
        room.packed()
    }
}

impl FromStr for RoomCoordinate {
    type Err = RoomNameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::parse(name)
    }
}

impl fmt::Display for RoomCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sim() {
            return f.write_str("sim");
        }
        if self.is_null() {
            return f.write_str("null");
        }

        let xx = i16::from(self.xx);
        let yy = i16::from(self.yy);
        if xx < 0 {
            write!(f, "W{}", -xx - 1)?;
        } else {
            write!(f, "E{xx}")?;
        }
        if yy < 0 {
            write!(f, "N{}", -yy - 1)
        } else {
            write!(f, "S{yy}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn room(name: &str) -> RoomCoordinate {
        name.parse().expect("valid room name")
    }

    #[test]
    fn parses_quadrants() {
        assert_eq!(room("E0S0"), RoomCoordinate::new(0, 0));
        assert_eq!(room("W0N0"), RoomCoordinate::new(-1, -1));
        assert_eq!(room("W3N5"), RoomCoordinate::new(-4, -6));
        assert_eq!(room("E12S0"), RoomCoordinate::new(12, 0));
        assert_eq!(room("E127S127"), RoomCoordinate::new(127, 127));
        assert_eq!(room("W126N127"), RoomCoordinate::new(-127, -128));
        assert_eq!(room("sim"), RoomCoordinate::SIM);
    }

    #[test]
    fn rejects_malformed_names() {
        for name in [
            "", "W", "W3", "W3N", "3N5", "X3N5", "W3X5", "WN5", "W3N5x", "w3n5", "W-3N5",
            "W3 N5", "simulation", " sim",
        ] {
            assert_eq!(
                RoomCoordinate::parse(name),
                Err(RoomNameError::InvalidFormat),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_and_reserved() {
        assert_eq!(
            RoomCoordinate::parse("E128S0"),
            Err(RoomNameError::OutOfRange { distance: 128 })
        );
        assert_eq!(
            RoomCoordinate::parse("E0S99999999999999"),
            Err(RoomNameError::OutOfRange { distance: u32::MAX })
        );
        assert_eq!(
            RoomCoordinate::parse("W127N127"),
            Err(RoomNameError::Reserved {
                reserved: RoomCoordinate::SIM
            })
        );
        assert_eq!(
            RoomCoordinate::parse("W127S127"),
            Err(RoomNameError::Reserved {
                reserved: RoomCoordinate::NULL
            })
        );
    }

    #[test]
    fn format_parse_round_trip_for_every_room() {
        for xx in i8::MIN..=i8::MAX {
            for yy in i8::MIN..=i8::MAX {
                let coordinate = RoomCoordinate::new(xx, yy);
                if coordinate.is_null() {
                    continue;
                }
                let name = coordinate.to_string();
                assert_eq!(room(&name), coordinate, "round trip of {name}");
            }
        }
    }

    #[test]
    fn formats_sentinels() {
        assert_eq!(RoomCoordinate::SIM.to_string(), "sim");
        assert_eq!(RoomCoordinate::NULL.to_string(), "null");
        assert_eq!(RoomCoordinate::new(-1, 0).to_string(), "W0S0");
        assert_eq!(RoomCoordinate::new(5, -3).to_string(), "E5N2");
    }

    #[test]
    fn packed_view_is_little_endian_axes() {
        assert_eq!(RoomCoordinate::SIM.packed(), 0x8080);
        assert_eq!(RoomCoordinate::NULL.packed(), 0x7f80);
        assert_eq!(RoomCoordinate::new(-1, 0).packed(), 0x00ff);
        assert_eq!(RoomCoordinate::new(1, 2).packed(), 0x0201);

        for packed in [0u16, 1, 0x7f80, 0x8080, 0xffff, 0x1234] {
            assert_eq!(RoomCoordinate::from_packed(packed).packed(), packed);
        }
    }

    #[test]
    fn equality_and_hash_follow_packed_value() {
        let rooms: HashSet<RoomCoordinate> = ["W1N1", "W1N1", "E0S0", "sim"]
            .into_iter()
            .map(room)
            .collect();
        assert_eq!(rooms.len(), 3);

        let mut sorted = vec![room("E1S0"), room("E0S1"), room("E0S0")];
        sorted.sort();
        let packed: Vec<u16> = sorted.iter().map(|room| room.packed()).collect();
        assert!(packed.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn world_indices_offset_by_half_the_world() {
        let coordinate = room("W0N0");
        assert_eq!((coordinate.world_x(), coordinate.world_y()), (127, 127));
        assert_eq!(RoomCoordinate::from_world_index(127, 127), coordinate);
        assert_eq!(RoomCoordinate::from_world_index(128, 128), room("E0S0"));
        assert_eq!(RoomCoordinate::from_world_index(0, 0), RoomCoordinate::SIM);
        assert_eq!(room("E0S0").world_x(), GridConfig::WORLD_HALF);
    }

    #[test]
    fn steps_never_land_on_the_null_room() {
        let beside_null = RoomCoordinate::new(-127, 127);
        assert_eq!(beside_null.in_direction(Direction::Left), None);
        assert_eq!(
            RoomCoordinate::new(-128, 126).in_direction(Direction::Bottom),
            None
        );
        assert_eq!(
            beside_null.in_direction(Direction::TopLeft),
            Some(RoomCoordinate::new(-128, 126))
        );

        assert_eq!(
            room("W126N127").in_direction(Direction::Left),
            Some(RoomCoordinate::SIM)
        );
    }

    #[test]
    fn steps_and_distances_between_rooms() {
        assert_eq!(room("W0N0").in_direction(Direction::BottomRight), Some(room("E0S0")));
        assert_eq!(room("E3S3").in_direction(Direction::Top), Some(room("E3S2")));
        assert_eq!(RoomCoordinate::new(127, 0).in_direction(Direction::Right), None);
        assert_eq!(room("W2N2").distance_to(room("E2S0")), 5);
    }
}
