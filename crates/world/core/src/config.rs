/// Grid geometry constants.
///
/// Never instantiated; the values are used directly, often as array lengths.
pub enum GridConfig {}

impl GridConfig {
    /// Side length of a room in cells.
    pub const ROOM_SIZE: u8 = 50;
    /// Number of cells in one room (50 × 50).
    pub const ROOM_AREA: usize = 2500;
    /// Largest valid local axis value.
    pub const ROOM_MAX: u8 = Self::ROOM_SIZE - 1;
    /// Number of rooms along each world axis.
    pub const WORLD_SIZE: u16 = 256;
    /// Offset between a signed room axis and its unsigned world index.
    pub const WORLD_HALF: u8 = 0x80;
    /// Largest distance from the center line that a room name may carry.
    pub const MAX_ROOM_DISTANCE: u8 = 127;
    /// Number of cells along each world axis (256 rooms × 50 cells).
    pub const WORLD_CELLS: u16 = Self::WORLD_SIZE * Self::ROOM_SIZE as u16;
}

/// Movement cost of each walkable terrain class.
///
/// Walls have no cost; they are impassable regardless of configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathCosts {
    pub plain: u8,
    pub swamp: u8,
}

impl PathCosts {
    pub const DEFAULT_PLAIN: u8 = 1;
    pub const DEFAULT_SWAMP: u8 = 5;

    pub const DEFAULT: Self = Self {
        plain: Self::DEFAULT_PLAIN,
        swamp: Self::DEFAULT_SWAMP,
    };

    pub const fn new(plain: u8, swamp: u8) -> Self {
        Self { plain, swamp }
    }
}

impl Default for PathCosts {
    fn default() -> Self {
        Self::DEFAULT
    }
}
