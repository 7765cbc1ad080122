use core::fmt::Debug;
use core::hash::Hash;

mod sealed {
    pub trait Sealed {}
}

/// Unsigned integer used as backing storage of a [`LocalMatrix`](super::LocalMatrix).
///
/// Implemented for `u8`, `u16`, `u32` and `u64`. Bit manipulation goes through
/// `u64`, which holds any of them losslessly.
pub trait StorageWord: Copy + Eq + Hash + Debug + Send + Sync + 'static + sealed::Sealed {
    /// Width of the word in bits.
    const BITS: u32;
    /// Width of the word in bytes on the wire.
    const BYTES: usize;
    const ZERO: Self;

    fn to_u64(self) -> u64;

    /// Truncates `value` to the word width.
    fn from_u64(value: u64) -> Self;

    fn extend_le_bytes(self, out: &mut Vec<u8>);

    /// Reads one word from exactly [`StorageWord::BYTES`] little-endian bytes.
    fn from_le_chunk(chunk: &[u8]) -> Self;
}

macro_rules! impl_storage_word {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl StorageWord for $ty {
                const BITS: u32 = <$ty>::BITS;
                const BYTES: usize = core::mem::size_of::<$ty>();
                const ZERO: Self = 0;

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(value: u64) -> Self {
                    value as $ty
                }

                #[inline]
                fn extend_le_bytes(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn from_le_chunk(chunk: &[u8]) -> Self {
                    let mut bytes = [0u8; core::mem::size_of::<$ty>()];
                    bytes.copy_from_slice(chunk);
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_storage_word!(u8, u16, u32, u64);
