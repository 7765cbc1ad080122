//! Bit-packed per-cell storage for one room.
//!
//! A [`LocalMatrix`] holds 2500 unsigned values of `BITS` bits each, indexed by
//! [`LocalPosition::index`] (`x * 50 + y`). Values are packed into storage
//! words of type `W`; cell `i` lives in word `i >> index_shift` at bit
//! `(i & index_mask) << log2(BITS)`.
//!
//! Padding bits past the last cell are kept at zero, so two matrices are equal
//! exactly when their words are, and the little-endian word bytes form a
//! stable wire format.
mod word;

pub use word::StorageWord;

use core::fmt;

use crate::config::GridConfig;
use crate::error::{ErrorSeverity, GridError};
use crate::position::LocalPosition;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatrixError {
    #[error("matrix buffer holds {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("matrix buffer has non-zero bits past the last cell")]
    NonZeroPadding,
}

impl GridError for MatrixError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::LengthMismatch { .. } => ErrorSeverity::Validation,
            Self::NonZeroPadding => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LengthMismatch { .. } => "MATRIX_LENGTH_MISMATCH",
            Self::NonZeroPadding => "MATRIX_NON_ZERO_PADDING",
        }
    }
}

/// One value per cell of a room, `BITS` bits wide, packed into `W` words.
///
/// `BITS` must be a power of two no wider than `W` (and at most 32). Other
/// widths fail to compile as soon as the type is used:
///
/// ```compile_fail
/// use world_core::matrix::LocalMatrix;
///
/// let matrix = LocalMatrix::<u8, 3>::new();
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "Vec<u8>", try_from = "Vec<u8>", bound = "")
)]
pub struct LocalMatrix<W: StorageWord, const BITS: u32> {
    words: Box<[W]>,
}

/// One bit per cell, e.g. visited sets.
pub type BitMatrix = LocalMatrix<u32, 1>;

/// One byte per cell, stored unpacked.
pub type ByteMatrix = LocalMatrix<u8, 8>;

impl<W: StorageWord, const BITS: u32> LocalMatrix<W, BITS> {
    const VALID_WIDTH: () = assert!(
        BITS > 0 && BITS.is_power_of_two() && BITS <= 32 && BITS <= W::BITS,
        "cell width must be a power of two that fits the storage word"
    );

    /// Largest storable value.
    pub const MASK: u32 = if BITS >= 32 { u32::MAX } else { (1 << BITS) - 1 };

    const FULL_WORD: bool = BITS == W::BITS;
    const VALUES_PER_WORD: usize = (W::BITS / BITS) as usize;
    const INDEX_SHIFT: u32 = Self::VALUES_PER_WORD.trailing_zeros();
    const INDEX_MASK: usize = Self::VALUES_PER_WORD - 1;
    const BIT_SHIFT: u32 = BITS.trailing_zeros();

    /// Number of storage words.
    pub const WORDS: usize = (GridConfig::ROOM_AREA * BITS as usize).div_ceil(W::BITS as usize);

    /// Length of the wire format in bytes.
    pub const BYTES: usize = Self::WORDS * W::BYTES;

    /// Bits of the last word that hold cells; zero when the cells fill it.
    const LAST_WORD_BITS: u32 = ((GridConfig::ROOM_AREA * BITS as usize) % W::BITS as usize) as u32;

    /// A matrix with every cell zero.
    pub fn new() -> Self {
        let () = Self::VALID_WIDTH;
        Self {
            words: vec![W::ZERO; Self::WORDS].into_boxed_slice(),
        }
    }

    /// A matrix with every cell set to `value` (masked to `BITS`).
    pub fn filled(value: u32) -> Self {
        let mut matrix = Self::new();
        matrix.fill(value);
        matrix
    }

    pub fn fill(&mut self, value: u32) {
        let value = u64::from(value & Self::MASK);
        if Self::FULL_WORD {
            self.words.fill(W::from_u64(value));
            return;
        }

        let mut pattern = 0u64;
        for slot in 0..Self::VALUES_PER_WORD as u32 {
            pattern |= value << (slot * BITS);
        }
        self.words.fill(W::from_u64(pattern));
        self.clear_padding();
    }

    fn clear_padding(&mut self) {
        if Self::LAST_WORD_BITS == 0 {
            return;
        }
        if let Some(last) = self.words.last_mut() {
            let kept = (1u64 << Self::LAST_WORD_BITS) - 1;
            *last = W::from_u64(last.to_u64() & kept);
        }
    }

    #[inline]
    pub fn get(&self, position: LocalPosition) -> u32 {
        self.get_index(position.index())
    }

    /// Stores `value` masked to `BITS`.
    #[inline]
    pub fn set(&mut self, position: LocalPosition, value: u32) {
        self.set_index(position.index(), value);
    }

    /// Value of the cell at raw index `index` (`x * 50 + y`).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 2500`.
    pub fn get_index(&self, index: usize) -> u32 {
        assert!(
            index < GridConfig::ROOM_AREA,
            "matrix index {index} out of bounds"
        );
        if Self::FULL_WORD {
            return self.words[index].to_u64() as u32;
        }
        let word = self.words[index >> Self::INDEX_SHIFT].to_u64();
        let bit = ((index & Self::INDEX_MASK) as u32) << Self::BIT_SHIFT;
        ((word >> bit) as u32) & Self::MASK
    }

    /// Stores `value` masked to `BITS` at raw index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 2500`.
    pub fn set_index(&mut self, index: usize, value: u32) {
        assert!(
            index < GridConfig::ROOM_AREA,
            "matrix index {index} out of bounds"
        );
        let value = u64::from(value & Self::MASK);
        if Self::FULL_WORD {
            self.words[index] = W::from_u64(value);
            return;
        }
        let slot = &mut self.words[index >> Self::INDEX_SHIFT];
        let bit = ((index & Self::INDEX_MASK) as u32) << Self::BIT_SHIFT;
        let mask = u64::from(Self::MASK) << bit;
        *slot = W::from_u64((slot.to_u64() & !mask) | (value << bit));
    }

    /// Every cell with its value, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (LocalPosition, u32)> + '_ {
        (0..GridConfig::ROOM_AREA).filter_map(move |index| {
            LocalPosition::from_index(index).map(|position| (position, self.get_index(index)))
        })
    }

    #[inline]
    pub fn as_words(&self) -> &[W] {
        &self.words
    }

    /// Wire format: every word little-endian, in order.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::BYTES);
        for word in self.words.iter() {
            word.extend_le_bytes(&mut bytes);
        }
        bytes
    }

    /// Parses the wire format, rejecting wrong lengths and set padding bits.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, MatrixError> {
        let () = Self::VALID_WIDTH;
        if bytes.len() != Self::BYTES {
            return Err(MatrixError::LengthMismatch {
                expected: Self::BYTES,
                actual: bytes.len(),
            });
        }

        let words: Box<[W]> = bytes.chunks_exact(W::BYTES).map(W::from_le_chunk).collect();
        if Self::LAST_WORD_BITS != 0 {
            let last = words.last().map_or(0, |word| word.to_u64());
            if last >> Self::LAST_WORD_BITS != 0 {
                return Err(MatrixError::NonZeroPadding);
            }
        }
        Ok(Self { words })
    }
}

impl<W: StorageWord, const BITS: u32> Default for LocalMatrix<W, BITS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: StorageWord, const BITS: u32> fmt::Debug for LocalMatrix<W, BITS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalMatrix")
            .field("bits", &BITS)
            .field("word_bits", &W::BITS)
            .field("words", &self.words.len())
            .finish_non_exhaustive()
    }
}

impl<W: StorageWord, const BITS: u32> From<LocalMatrix<W, BITS>> for Vec<u8> {
    fn from(matrix: LocalMatrix<W, BITS>) -> Vec<u8> {
        matrix.to_le_bytes()
    }
}

impl<W: StorageWord, const BITS: u32> TryFrom<Vec<u8>> for LocalMatrix<W, BITS> {
    type Error = MatrixError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_le_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: u8, y: u8) -> LocalPosition {
        LocalPosition::new(x, y).expect("in room")
    }

    fn round_trip_every_value<W: StorageWord, const BITS: u32>() {
        let mut matrix = LocalMatrix::<W, BITS>::new();
        let values = 1u32 << BITS;

        for index in 0..GridConfig::ROOM_AREA {
            for value in 0..values {
                matrix.set_index(index, value);
                assert_eq!(matrix.get_index(index), value, "index {index}");
            }
        }

        // Distinct neighbors must not clobber each other.
        for index in 0..GridConfig::ROOM_AREA {
            matrix.set_index(index, (index as u32 * 7 + 3) % values);
        }
        for index in 0..GridConfig::ROOM_AREA {
            assert_eq!(matrix.get_index(index), (index as u32 * 7 + 3) % values);
        }
    }

    #[test]
    fn round_trips_every_width() {
        round_trip_every_value::<u8, 1>();
        round_trip_every_value::<u8, 2>();
        round_trip_every_value::<u8, 4>();
        round_trip_every_value::<u8, 8>();
        round_trip_every_value::<u16, 2>();
        round_trip_every_value::<u32, 4>();
        round_trip_every_value::<u64, 1>();
        round_trip_every_value::<u64, 8>();
    }

    #[test]
    fn wide_cells_round_trip() {
        let mut matrix = LocalMatrix::<u64, 32>::new();
        matrix.set(pos(49, 49), u32::MAX);
        matrix.set(pos(49, 48), 0x1234_5678);
        assert_eq!(matrix.get(pos(49, 49)), u32::MAX);
        assert_eq!(matrix.get(pos(49, 48)), 0x1234_5678);

        let mut matrix = LocalMatrix::<u16, 16>::filled(0xbeef);
        matrix.set_index(7, 1);
        assert_eq!(matrix.get_index(6), 0xbeef);
        assert_eq!(matrix.get_index(7), 1);
    }

    #[test]
    fn sizes_follow_width() {
        assert_eq!(LocalMatrix::<u8, 2>::BYTES, 625);
        assert_eq!(ByteMatrix::BYTES, 2500);
        assert_eq!(BitMatrix::WORDS, 79);
        assert_eq!(LocalMatrix::<u64, 4>::WORDS, 157);
        assert_eq!(LocalMatrix::<u8, 1>::BYTES, 313);
    }

    #[test]
    fn values_are_masked_on_write() {
        let mut matrix = LocalMatrix::<u8, 2>::new();
        matrix.set(pos(0, 1), 0b111);
        assert_eq!(matrix.get(pos(0, 1)), 0b11);
        assert_eq!(matrix.get(pos(0, 0)), 0);
        assert_eq!(matrix.get(pos(0, 2)), 0);

        let mut matrix = ByteMatrix::new();
        matrix.set(pos(3, 3), 0x1ff);
        assert_eq!(matrix.get(pos(3, 3)), 0xff);
    }

    #[test]
    fn fill_leaves_padding_clear() {
        let matrix = BitMatrix::filled(1);
        assert!(matrix.iter().all(|(_, value)| value == 1));
        // 2500 % 32 == 4 cells live in the last word.
        assert_eq!(matrix.as_words().last(), Some(&0b1111));

        // 2500 * 4 % 64 == 16 bits of the last word are cells.
        let matrix = LocalMatrix::<u64, 4>::filled(0xf);
        assert_eq!(matrix.as_words().last(), Some(&0xffff));
        assert_eq!(matrix.as_words()[0], u64::MAX);
    }

    #[test]
    fn equality_is_word_equality() {
        let mut a = LocalMatrix::<u8, 4>::new();
        let mut b = LocalMatrix::<u8, 4>::filled(0);
        assert_eq!(a, b);

        a.set(pos(10, 20), 9);
        assert_ne!(a, b);
        b.set(pos(10, 20), 9);
        assert_eq!(a, b);

        a.fill(5);
        b.fill(5 | 0x10);
        assert_eq!(a, b);
    }

    #[test]
    fn iterates_in_index_order() {
        let mut matrix = ByteMatrix::new();
        matrix.set(pos(1, 0), 42);
        let cells: Vec<_> = matrix.iter().take(51).collect();
        assert_eq!(cells[1], (pos(0, 1), 0));
        assert_eq!(cells[50], (pos(1, 0), 42));
        assert_eq!(matrix.iter().count(), GridConfig::ROOM_AREA);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_index_past_the_room_panics() {
        LocalMatrix::<u8, 1>::new().get_index(GridConfig::ROOM_AREA);
    }

    #[test]
    fn wire_bytes_are_packed_little_endian() {
        let mut matrix = LocalMatrix::<u8, 2>::new();
        matrix.set_index(0, 1);
        matrix.set_index(5, 2);
        let bytes = matrix.to_le_bytes();
        assert_eq!(bytes.len(), 625);
        assert_eq!(hex::encode(&bytes[..2]), "0108");

        let mut matrix = LocalMatrix::<u16, 4>::new();
        matrix.set_index(0, 0xa);
        matrix.set_index(3, 0x5);
        assert_eq!(hex::encode(&matrix.to_le_bytes()[..2]), "0a50");

        let parsed = LocalMatrix::<u16, 4>::from_le_bytes(&matrix.to_le_bytes());
        assert_eq!(parsed, Ok(matrix));
    }

    #[test]
    fn from_le_bytes_validates_buffer() {
        assert_eq!(
            ByteMatrix::from_le_bytes(&[0; 10]),
            Err(MatrixError::LengthMismatch {
                expected: 2500,
                actual: 10
            })
        );

        let mut bytes = vec![0u8; 313];
        bytes[312] = 0x0f;
        let matrix = LocalMatrix::<u8, 1>::from_le_bytes(&bytes).expect("padding clear");
        assert_eq!(matrix.get(pos(49, 49)), 1);
        assert_eq!(matrix.get_index(2496), 1);

        bytes[312] = 0x10;
        assert_eq!(
            LocalMatrix::<u8, 1>::from_le_bytes(&bytes),
            Err(MatrixError::NonZeroPadding)
        );
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(MatrixError::NonZeroPadding.error_code(), "MATRIX_NON_ZERO_PADDING");
        assert_eq!(
            MatrixError::NonZeroPadding.severity(),
            ErrorSeverity::Internal
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_wire_bytes() {
        let mut matrix = LocalMatrix::<u8, 2>::new();
        matrix.set(pos(12, 34), 2);

        let encoded = bincode::serialize(&matrix).expect("serialize");
        // u64 length prefix followed by the wire bytes.
        assert_eq!(encoded.len(), 8 + 625);
        assert_eq!(&encoded[8..], matrix.to_le_bytes().as_slice());

        let decoded: LocalMatrix<u8, 2> = bincode::deserialize(&encoded).expect("deserialize");
        assert_eq!(decoded, matrix);
    }
}
