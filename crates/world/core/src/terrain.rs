//! Static room terrain, per-cell movement cost overrides, and the oracles that
//! supply both.
use std::collections::HashMap;

use crate::config::PathCosts;
use crate::error::{ErrorSeverity, GridError};
use crate::matrix::{ByteMatrix, LocalMatrix, MatrixError};
use crate::position::LocalPosition;
use crate::room::RoomCoordinate;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TerrainError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("invalid terrain code {code} at {position}")]
    InvalidCode { position: LocalPosition, code: u8 },

    #[error("no terrain available for room {room}")]
    Unavailable { room: RoomCoordinate },

    #[error("terrain source failed for room {room}: {message}")]
    Source {
        room: RoomCoordinate,
        message: String,
    },
}

impl GridError for TerrainError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Matrix(error) => error.severity(),
            Self::InvalidCode { .. } => ErrorSeverity::Validation,
            Self::Unavailable { .. } | Self::Source { .. } => ErrorSeverity::External,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Matrix(error) => error.error_code(),
            Self::InvalidCode { .. } => "TERRAIN_INVALID_CODE",
            Self::Unavailable { .. } => "TERRAIN_UNAVAILABLE",
            Self::Source { .. } => "TERRAIN_SOURCE_FAILED",
        }
    }
}

/// Terrain class of a single cell, stored as a 2-bit code.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum Terrain {
    #[default]
    Plain = 0,
    Wall = 1,
    Swamp = 2,
}

impl Terrain {
    pub const ALL: [Terrain; 3] = [Terrain::Plain, Terrain::Wall, Terrain::Swamp];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a 2-bit code; `None` for the unused code 3 and anything wider.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Terrain::Plain),
            1 => Some(Terrain::Wall),
            2 => Some(Terrain::Swamp),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Terrain::Wall)
    }
}

/// Terrain of a whole room: two bits per cell, 625 bytes on the wire.
///
/// Code 3 never appears; every constructor rejects or cannot produce it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "Vec<u8>", try_from = "Vec<u8>")
)]
pub struct TerrainMatrix {
    cells: LocalMatrix<u8, 2>,
}

impl TerrainMatrix {
    /// Wire length in bytes.
    pub const BYTES: usize = LocalMatrix::<u8, 2>::BYTES;

    /// A room of plain cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a room by asking `terrain_at` for every cell.
    pub fn from_fn(mut terrain_at: impl FnMut(LocalPosition) -> Terrain) -> Self {
        let mut matrix = Self::new();
        for position in LocalPosition::all() {
            matrix.set(position, terrain_at(position));
        }
        matrix
    }

    /// Parses the 625-byte wire format.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, TerrainError> {
        let cells = LocalMatrix::<u8, 2>::from_le_bytes(bytes)?;
        if let Some((position, code)) = cells
            .iter()
            .find(|&(_, code)| Terrain::from_code(code as u8).is_none())
        {
            return Err(TerrainError::InvalidCode {
                position,
                code: code as u8,
            });
        }
        Ok(Self { cells })
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.cells.to_le_bytes()
    }

    pub fn get(&self, position: LocalPosition) -> Terrain {
        // Only codes 0..=2 are ever stored.
        Terrain::from_code(self.cells.get(position) as u8).unwrap_or(Terrain::Wall)
    }

    pub fn set(&mut self, position: LocalPosition, terrain: Terrain) {
        self.cells.set(position, u32::from(terrain.code()));
    }

    pub fn is_walkable(&self, position: LocalPosition) -> bool {
        self.get(position).is_walkable()
    }

    /// Number of cells of the given class.
    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells
            .iter()
            .filter(|&(_, code)| code == u32::from(terrain.code()))
            .count()
    }

    pub fn as_matrix(&self) -> &LocalMatrix<u8, 2> {
        &self.cells
    }
}

impl From<TerrainMatrix> for Vec<u8> {
    fn from(terrain: TerrainMatrix) -> Vec<u8> {
        terrain.to_le_bytes()
    }
}

impl TryFrom<Vec<u8>> for TerrainMatrix {
    type Error = TerrainError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_le_bytes(&bytes)
    }
}

/// Per-cell movement cost overrides for one room, one byte per cell.
///
/// `0` keeps the terrain's own cost, [`CostMatrix::IMPASSABLE`] blocks the
/// cell, and any other value replaces the terrain cost, walls included.
pub type CostMatrix = ByteMatrix;

impl CostMatrix {
    pub const TERRAIN_COST: u8 = 0;
    pub const IMPASSABLE: u8 = u8::MAX;
}

/// How a pathfinder should treat a room.
#[derive(Clone, Copy, Debug, Default)]
pub enum RoomCosts<'a> {
    /// Terrain costs only.
    #[default]
    Terrain,
    /// Terrain costs with per-cell overrides.
    Matrix(&'a CostMatrix),
    /// The room must not be entered.
    Blocked,
}

impl PathCosts {
    /// Cost of entering a cell of `terrain` with override byte `cost`;
    /// `None` when the cell cannot be entered.
    pub const fn cell_cost(&self, terrain: Terrain, cost: u8) -> Option<u8> {
        match cost {
            CostMatrix::IMPASSABLE => None,
            CostMatrix::TERRAIN_COST => match terrain {
                Terrain::Plain => Some(self.plain),
                Terrain::Swamp => Some(self.swamp),
                Terrain::Wall => None,
            },
            cost => Some(cost),
        }
    }

    /// Effective cost of entering `position` in a room.
    pub fn resolve(
        &self,
        terrain: &TerrainMatrix,
        costs: RoomCosts<'_>,
        position: LocalPosition,
    ) -> Option<u8> {
        let cost = match costs {
            RoomCosts::Blocked => return None,
            RoomCosts::Terrain => CostMatrix::TERRAIN_COST,
            RoomCosts::Matrix(matrix) => matrix.get(position) as u8,
        };
        self.cell_cost(terrain.get(position), cost)
    }

    /// Flattens terrain and overrides into one matrix of final costs, with
    /// [`CostMatrix::IMPASSABLE`] marking blocked cells.
    pub fn effective_costs(&self, terrain: &TerrainMatrix, costs: RoomCosts<'_>) -> CostMatrix {
        let mut effective = CostMatrix::new();
        for position in LocalPosition::all() {
            let cost = self
                .resolve(terrain, costs, position)
                .unwrap_or(CostMatrix::IMPASSABLE);
            effective.set(position, u32::from(cost));
        }
        effective
    }
}

/// Supplies the static terrain of rooms.
pub trait TerrainSource: Send + Sync {
    fn terrain(&self, room: RoomCoordinate) -> Result<TerrainMatrix, TerrainError>;
}

/// Supplies per-room cost overrides to a pathfinder.
pub trait CostMatrixSource {
    fn room_costs(&self, room: RoomCoordinate) -> RoomCosts<'_>;
}

impl<F> TerrainSource for F
where
    F: Fn(RoomCoordinate) -> Result<TerrainMatrix, TerrainError> + Send + Sync,
{
    fn terrain(&self, room: RoomCoordinate) -> Result<TerrainMatrix, TerrainError> {
        self(room)
    }
}

/// In-memory terrain for a fixed set of rooms.
#[derive(Clone, Debug, Default)]
pub struct StaticTerrain {
    rooms: HashMap<RoomCoordinate, TerrainMatrix>,
}

impl StaticTerrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_room(mut self, room: RoomCoordinate, terrain: TerrainMatrix) -> Self {
        self.insert(room, terrain);
        self
    }

    pub fn insert(&mut self, room: RoomCoordinate, terrain: TerrainMatrix) {
        self.rooms.insert(room, terrain);
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl TerrainSource for StaticTerrain {
    fn terrain(&self, room: RoomCoordinate) -> Result<TerrainMatrix, TerrainError> {
        self.rooms
            .get(&room)
            .cloned()
            .ok_or(TerrainError::Unavailable { room })
    }
}

/// Fixed cost overrides per room; rooms without an entry use terrain costs.
#[derive(Clone, Debug, Default)]
pub struct StaticCosts {
    matrices: HashMap<RoomCoordinate, CostMatrix>,
    blocked: Vec<RoomCoordinate>,
}

impl StaticCosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matrix(mut self, room: RoomCoordinate, matrix: CostMatrix) -> Self {
        self.matrices.insert(room, matrix);
        self
    }

    pub fn with_blocked(mut self, room: RoomCoordinate) -> Self {
        self.blocked.push(room);
        self
    }
}

impl CostMatrixSource for StaticCosts {
    fn room_costs(&self, room: RoomCoordinate) -> RoomCosts<'_> {
        if self.blocked.contains(&room) {
            return RoomCosts::Blocked;
        }
        self.matrices
            .get(&room)
            .map_or(RoomCosts::Terrain, RoomCosts::Matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: u8, y: u8) -> LocalPosition {
        LocalPosition::new(x, y).expect("in room")
    }

    fn room(name: &str) -> RoomCoordinate {
        name.parse().expect("valid room name")
    }

    /// Walls on the border, a swamp column at x = 10, plain elsewhere.
    fn walled_room() -> TerrainMatrix {
        TerrainMatrix::from_fn(|position| {
            if position.is_on_edge() {
                Terrain::Wall
            } else if position.x() == 10 {
                Terrain::Swamp
            } else {
                Terrain::Plain
            }
        })
    }

    #[test]
    fn terrain_names_and_codes() {
        assert_eq!(Terrain::Swamp.to_string(), "swamp");
        assert_eq!("WALL".parse::<Terrain>(), Ok(Terrain::Wall));
        for terrain in Terrain::ALL {
            assert_eq!(Terrain::from_code(terrain.code()), Some(terrain));
        }
        assert_eq!(Terrain::from_code(3), None);
    }

    #[test]
    fn wire_layout_is_two_bits_per_cell_x_major() {
        let mut terrain = TerrainMatrix::new();
        terrain.set(pos(0, 0), Terrain::Wall);
        terrain.set(pos(0, 1), Terrain::Swamp);
        terrain.set(pos(0, 3), Terrain::Wall);
        // Index 50 is (1, 0): byte 12, bits 4..6.
        terrain.set(pos(1, 0), Terrain::Swamp);

        let bytes = terrain.to_le_bytes();
        assert_eq!(bytes.len(), TerrainMatrix::BYTES);
        assert_eq!(hex::encode(&bytes[..1]), "49");
        assert_eq!(bytes[12], 0x20);
        assert_eq!(TerrainMatrix::from_le_bytes(&bytes), Ok(terrain));
    }

    #[test]
    fn rejects_unused_code() {
        let mut bytes = vec![0u8; TerrainMatrix::BYTES];
        bytes[1] = 0b0000_1100;
        assert_eq!(
            TerrainMatrix::from_le_bytes(&bytes),
            Err(TerrainError::InvalidCode {
                position: pos(0, 5),
                code: 3
            })
        );
        assert_eq!(
            TerrainMatrix::from_le_bytes(&bytes[..600]),
            Err(TerrainError::Matrix(MatrixError::LengthMismatch {
                expected: 625,
                actual: 600
            }))
        );
    }

    #[test]
    fn counts_cells_by_class() {
        let terrain = walled_room();
        assert_eq!(terrain.count(Terrain::Wall), 196);
        assert_eq!(terrain.count(Terrain::Swamp), 48);
        assert_eq!(terrain.count(Terrain::Plain), 2500 - 196 - 48);
        assert!(!terrain.is_walkable(pos(0, 7)));
        assert!(terrain.is_walkable(pos(10, 7)));
    }

    #[test]
    fn resolves_costs_from_terrain_and_overrides() {
        let terrain = walled_room();
        let costs = PathCosts::default();
        assert_eq!(costs.resolve(&terrain, RoomCosts::Terrain, pos(5, 5)), Some(1));
        assert_eq!(costs.resolve(&terrain, RoomCosts::Terrain, pos(10, 5)), Some(5));
        assert_eq!(costs.resolve(&terrain, RoomCosts::Terrain, pos(0, 5)), None);
        assert_eq!(costs.resolve(&terrain, RoomCosts::Blocked, pos(5, 5)), None);

        let mut overrides = CostMatrix::new();
        overrides.set(pos(5, 5), 20);
        overrides.set(pos(10, 5), u32::from(CostMatrix::IMPASSABLE));
        overrides.set(pos(0, 5), 3);
        let with = RoomCosts::Matrix(&overrides);
        assert_eq!(costs.resolve(&terrain, with, pos(5, 5)), Some(20));
        assert_eq!(costs.resolve(&terrain, with, pos(10, 5)), None);
        assert_eq!(costs.resolve(&terrain, with, pos(0, 5)), Some(3));
        assert_eq!(costs.resolve(&terrain, with, pos(6, 6)), Some(1));

        let custom = PathCosts::new(2, 10);
        assert_eq!(custom.resolve(&terrain, with, pos(10, 6)), Some(10));
    }

    #[test]
    fn effective_costs_mark_blocked_cells() {
        let terrain = walled_room();
        let costs = PathCosts::default();
        let effective = costs.effective_costs(&terrain, RoomCosts::Terrain);
        assert_eq!(effective.get(pos(0, 0)), 255);
        assert_eq!(effective.get(pos(10, 1)), 5);
        assert_eq!(effective.get(pos(11, 1)), 1);

        let blocked = costs.effective_costs(&terrain, RoomCosts::Blocked);
        assert_eq!(blocked, CostMatrix::filled(255));
    }

    #[test]
    fn static_sources_serve_known_rooms() {
        let source = StaticTerrain::new().with_room(room("W1N1"), walled_room());
        assert_eq!(source.len(), 1);
        assert_eq!(source.terrain(room("W1N1")), Ok(walled_room()));
        assert_eq!(
            source.terrain(room("E1S1")),
            Err(TerrainError::Unavailable { room: room("E1S1") })
        );
        assert_eq!(
            source.terrain(room("E1S1")).map_err(|error| error.severity()),
            Err(ErrorSeverity::External)
        );

        let mut overrides = CostMatrix::new();
        overrides.set(pos(1, 1), 9);
        let costs = StaticCosts::new()
            .with_matrix(room("W1N1"), overrides)
            .with_blocked(room("E0S0"));
        assert!(matches!(costs.room_costs(room("E0S0")), RoomCosts::Blocked));
        assert!(matches!(costs.room_costs(room("E5S5")), RoomCosts::Terrain));
        match costs.room_costs(room("W1N1")) {
            RoomCosts::Matrix(matrix) => assert_eq!(matrix.get(pos(1, 1)), 9),
            other => panic!("unexpected room costs {other:?}"),
        }
    }

    #[test]
    fn closures_are_terrain_sources() {
        let source = |room: RoomCoordinate| {
            if room.is_sim() {
                Ok(TerrainMatrix::new())
            } else {
                Err(TerrainError::Source {
                    room,
                    message: "offline".to_string(),
                })
            }
        };
        assert_eq!(source.terrain(RoomCoordinate::SIM), Ok(TerrainMatrix::new()));
        let error = source.terrain(room("E0S0")).expect_err("source fails");
        assert_eq!(error.error_code(), "TERRAIN_SOURCE_FAILED");
        assert_eq!(error.to_string(), "terrain source failed for room E0S0: offline");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_wire_bytes() {
        let terrain = walled_room();
        let encoded = bincode::serialize(&terrain).expect("serialize");
        assert_eq!(&encoded[8..], terrain.to_le_bytes().as_slice());
        let decoded: TerrainMatrix = bincode::deserialize(&encoded).expect("deserialize");
        assert_eq!(decoded, terrain);
    }
}
