//! # Sparse Keys
//!
//! Unsigned integer types usable as sparse-set keys.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// An unsigned integer usable as a sparse-set key.
///
/// The maximum representable value is reserved as the "absent" sentinel in
/// the sparse index, so it can never be stored as a key.
pub trait SparseKey: Copy + Ord + Hash + Debug + Display + Send + Sync + 'static {
    /// Sentinel marking an empty sparse slot. Equal to the type's maximum.
    const ABSENT: Self;

    /// Converts the key into a vector index.
    ///
    /// Saturates to `usize::MAX` on targets where the key is wider than
    /// `usize`.
    fn to_index(self) -> usize;

    /// Converts a vector index back into a key.
    ///
    /// Saturates to [`SparseKey::ABSENT`] if `index` does not fit.
    fn from_index(index: usize) -> Self;

    /// Widens the key for error reporting and logging.
    fn to_u64(self) -> u64;
}

macro_rules! impl_sparse_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SparseKey for $ty {
                const ABSENT: Self = <$ty>::MAX;

                #[inline]
                fn to_index(self) -> usize {
                    usize::try_from(self).unwrap_or(usize::MAX)
                }

                #[inline]
                fn from_index(index: usize) -> Self {
                    <$ty>::try_from(index).unwrap_or(<$ty>::MAX)
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    u64::try_from(self).unwrap_or(u64::MAX)
                }
            }
        )*
    };
}

impl_sparse_key!(u8, u16, u32, u64, usize);
