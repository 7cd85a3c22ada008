//! # Sparse Set
//!
//! O(1) amortized insert, remove and lookup over a sparse integer key
//! space, with hole-free iteration over the stored values.

use std::ops::{Index, IndexMut};

use super::key::SparseKey;
use crate::error::{EcsError, EcsResult};

/// A key-value container built from three parallel arrays.
///
/// Invariants:
/// - `sparse[k] != ABSENT` exactly when `k` is in `dense`
/// - `dense[sparse[k]] == k` whenever `sparse[k]` is set
/// - `dense.len() == values.len()`
///
/// # Type Parameters
///
/// * `K` - The key type (an unsigned integer)
/// * `V` - The value type
///
/// # Example
///
/// ```rust
/// use easys_core::SparseSet;
///
/// let mut set: SparseSet<u32, &str> = SparseSet::new();
/// set.set(7, "seven")?;
/// assert_eq!(*set.get(7)?, "seven");
/// # Ok::<(), easys_core::EcsError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SparseSet<K: SparseKey, V> {
    /// Indexed by key, holds a dense position or `K::ABSENT`.
    sparse: Vec<K>,
    /// Packed active keys.
    dense: Vec<K>,
    /// Packed values, parallel to `dense`.
    values: Vec<V>,
    /// Keys must be strictly below this bound.
    key_limit: usize,
}

impl<K: SparseKey, V> Default for SparseSet<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SparseKey, V> SparseSet<K, V> {
    /// Creates an empty set accepting every key below `K::MAX`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_limit(usize::MAX)
    }

    /// Creates an empty set accepting keys strictly below `limit`.
    ///
    /// The effective limit never exceeds `K::MAX`, which is reserved as the
    /// absent sentinel.
    #[must_use]
    pub fn with_key_limit(limit: usize) -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            values: Vec::new(),
            key_limit: limit.min(K::ABSENT.to_index()),
        }
    }

    /// Returns the exclusive upper bound on keys.
    #[inline]
    #[must_use]
    pub const fn key_limit(&self) -> usize {
        self.key_limit
    }

    /// Grows the sparse index so that `key` can be addressed.
    ///
    /// Growth is geometric, so a monotonically increasing run of keys stays
    /// amortized O(1).
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if `key` is at or beyond the
    /// key limit. Nothing is allocated in that case.
    pub fn accommodate(&mut self, key: K) -> EcsResult<()> {
        let index = key.to_index();
        if index >= self.key_limit {
            tracing::warn!(key = key.to_u64(), limit = self.key_limit, "sparse key rejected");
            return Err(EcsError::CapacityExceeded {
                limit: self.key_limit,
            });
        }

        if index >= self.sparse.len() {
            let grown = index.saturating_mul(2).saturating_add(1).min(self.key_limit);
            self.sparse.resize(grown, K::ABSENT);
        }
        Ok(())
    }

    /// Associates `value` with `key`, replacing any previous value in place.
    ///
    /// A new key is appended after every entry currently stored.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if `key` is beyond the key
    /// limit. The set is unchanged in that case.
    pub fn set(&mut self, key: K, value: V) -> EcsResult<()> {
        if let Some(position) = self.position(key) {
            self.values[position] = value;
            return Ok(());
        }

        self.accommodate(key)?;
        self.sparse[key.to_index()] = K::from_index(self.dense.len());
        self.dense.push(key);
        self.values.push(value);
        Ok(())
    }

    /// Returns the value stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::KeyNotFound`] if `key` is absent.
    #[inline]
    pub fn get(&self, key: K) -> EcsResult<&V> {
        match self.position(key) {
            Some(position) => Ok(&self.values[position]),
            None => Err(EcsError::KeyNotFound { key: key.to_u64() }),
        }
    }

    /// Returns the value stored for `key` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::KeyNotFound`] if `key` is absent.
    #[inline]
    pub fn get_mut(&mut self, key: K) -> EcsResult<&mut V> {
        match self.position(key) {
            Some(position) => Ok(&mut self.values[position]),
            None => Err(EcsError::KeyNotFound { key: key.to_u64() }),
        }
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    ///
    /// The last entry is moved into the vacated slot, so this reorders the
    /// packed arrays.
    pub fn remove(&mut self, key: K) -> Option<V> {
        let position = self.position(key)?;
        let last = *self.dense.last()?;

        self.dense.swap_remove(position);
        let value = self.values.swap_remove(position);
        if last != key {
            self.sparse[last.to_index()] = K::from_index(position);
        }
        self.sparse[key.to_index()] = K::ABSENT;

        Some(value)
    }

    /// Checks whether `key` is stored.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.position(key).is_some()
    }

    /// Number of stored entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if nothing is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Stored keys in packing order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.dense
    }

    /// Stored values in packing order, parallel to [`SparseSet::keys`].
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Mutable view of the stored values in packing order.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [V] {
        &mut self.values
    }

    /// Iterates over `(key, value)` pairs in packing order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.dense.iter().copied().zip(self.values.iter())
    }

    /// Iterates mutably over `(key, value)` pairs in packing order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut V)> {
        self.dense.iter().copied().zip(self.values.iter_mut())
    }

    /// Calls `f` for every stored entry in packing order.
    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(K, &mut V),
    {
        for (key, value) in self.iter_mut() {
            f(key, value);
        }
    }

    /// Removes every entry and releases the sparse index.
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
        self.values.clear();
    }

    #[inline]
    fn position(&self, key: K) -> Option<usize> {
        let slot = *self.sparse.get(key.to_index())?;
        (slot != K::ABSENT).then_some(slot.to_index())
    }
}

/// Unchecked fast access for keys the caller has already validated.
///
/// # Panics
///
/// Panics if `key` is absent. Probe with [`SparseSet::contains`] first.
impl<K: SparseKey, V> Index<K> for SparseSet<K, V> {
    type Output = V;

    #[inline]
    fn index(&self, key: K) -> &V {
        match self.position(key) {
            Some(position) => &self.values[position],
            None => panic!("key {key} is not present in the sparse set"),
        }
    }
}

impl<K: SparseKey, V> IndexMut<K> for SparseSet<K, V> {
    #[inline]
    fn index_mut(&mut self, key: K) -> &mut V {
        match self.position(key) {
            Some(position) => &mut self.values[position],
            None => panic!("key {key} is not present in the sparse set"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    fn assert_invariants<V>(set: &SparseSet<u32, V>) {
        assert_eq!(set.keys().len(), set.len());
        assert_eq!(set.values().len(), set.len());
        for (position, key) in set.keys().iter().enumerate() {
            assert!(set.contains(*key));
            assert_eq!(set.position(*key), Some(position));
        }
    }

    #[test]
    fn test_initially_empty() {
        let set: SparseSet<u32, i32> = SparseSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert!(!set.contains(0));
    }

    #[test]
    fn test_set_and_get() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        set.set(1, 100).unwrap();
        set.set(2, 200).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(*set.get(1).unwrap(), 100);
        assert_eq!(*set.get(2).unwrap(), 200);
        assert_invariants(&set);
    }

    #[test]
    fn test_get_missing_key_fails() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        set.set(1, 100).unwrap();
        assert_eq!(set.get(2), Err(EcsError::KeyNotFound { key: 2 }));
        // Beyond the sparse index entirely.
        assert_eq!(set.get(5000), Err(EcsError::KeyNotFound { key: 5000 }));
    }

    #[test]
    fn test_missing_key_reported_at_full_width() {
        let set: SparseSet<u64, i32> = SparseSet::new();
        let key = u64::MAX - 1;
        assert_eq!(set.get(key), Err(EcsError::KeyNotFound { key }));
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        set.set(4, 1).unwrap();
        set.set(9, 2).unwrap();
        set.set(4, 3).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.keys(), &[4, 9]);
        assert_eq!(set.values(), &[3, 2]);
    }

    #[test]
    fn test_remove_swaps_last_into_slot() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        for key in 0..5 {
            set.set(key, i32::try_from(key).unwrap() * 10).unwrap();
        }

        assert_eq!(set.remove(1), Some(10));
        assert_eq!(set.keys(), &[0, 4, 2, 3]);
        assert_eq!(*set.get(4).unwrap(), 40);
        assert!(!set.contains(1));
        assert_invariants(&set);
    }

    #[test]
    fn test_remove_last_entry() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        set.set(3, 30).unwrap();
        set.set(8, 80).unwrap();

        assert_eq!(set.remove(8), Some(80));
        assert_eq!(set.keys(), &[3]);
        assert!(!set.contains(8));
        assert_eq!(set.remove(3), Some(30));
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        set.set(1, 100).unwrap();

        assert_eq!(set.remove(2), None);
        assert_eq!(set.remove(10_000), None);
        assert_eq!(set.len(), 1);
        assert_invariants(&set);
    }

    #[test]
    fn test_reinsert_after_remove() {
        let mut set: SparseSet<u32, Position> = SparseSet::new();
        set.set(1, Position { x: 1.0, y: 2.0 }).unwrap();
        set.remove(1);
        set.set(1, Position { x: 3.0, y: 4.0 }).unwrap();

        assert_eq!(*set.get(1).unwrap(), Position { x: 3.0, y: 4.0 });
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iteration_visits_every_entry() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        set.set(1, 100).unwrap();
        set.set(2, 200).unwrap();

        let mut keys: Vec<u32> = set.iter().map(|(key, _)| key).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![1, 2]);

        set.for_each(|_, value| *value += 1);
        assert_eq!(set.values(), &[101, 201]);

        for value in set.values_mut() {
            *value = 0;
        }
        assert_eq!(*set.get(2).unwrap(), 0);
    }

    #[test]
    fn test_accommodate_does_not_insert() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        set.accommodate(10).unwrap();
        assert!(set.keys().is_empty());
        assert!(set.sparse.len() >= 11);
    }

    #[test]
    fn test_accommodate_grows_geometrically() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        set.accommodate(100).unwrap();
        assert_eq!(set.sparse.len(), 201);
        // Already covered, no growth.
        set.accommodate(150).unwrap();
        assert_eq!(set.sparse.len(), 201);
    }

    #[test]
    fn test_key_limit_rejects_large_keys() {
        let mut set: SparseSet<u32, i32> = SparseSet::with_key_limit(16);
        assert!(set.set(15, 1).is_ok());
        assert_eq!(set.set(16, 2), Err(EcsError::CapacityExceeded { limit: 16 }));
        assert_eq!(set.len(), 1);
        assert!(set.sparse.len() <= 16);
    }

    #[test]
    fn test_key_limit_never_exceeds_sentinel() {
        let mut set: SparseSet<u8, i32> = SparseSet::new();
        assert_eq!(set.key_limit(), usize::from(u8::MAX));
        assert!(set.set(254, 1).is_ok());
        assert_eq!(
            set.set(u8::MAX, 2),
            Err(EcsError::CapacityExceeded {
                limit: usize::from(u8::MAX)
            })
        );
    }

    #[test]
    fn test_index_access() {
        let mut set: SparseSet<u32, i32> = SparseSet::new();
        set.set(3, 30).unwrap();
        assert_eq!(set[3], 30);
        set[3] = 31;
        assert_eq!(set[3], 31);
    }

    #[test]
    #[should_panic(expected = "not present")]
    fn test_index_panics_when_absent() {
        let set: SparseSet<u32, i32> = SparseSet::new();
        let _ = set[3];
    }

    #[test]
    fn test_clear() {
        let mut set: SparseSet<u32, Position> = SparseSet::new();
        set.set(1, Position { x: 1.0, y: 2.0 }).unwrap();
        set.clear();

        assert_eq!(set.len(), 0);
        assert!(!set.contains(1));
        assert!(set.get(1).is_err());
    }

    #[test]
    fn test_churn_preserves_invariants() {
        let mut set: SparseSet<u32, u32> = SparseSet::new();
        for key in 0..200 {
            set.set(key, key).unwrap();
        }
        for key in (0..200).step_by(3) {
            set.remove(key);
        }
        for key in (0..200).step_by(7) {
            set.set(key, key + 1000).unwrap();
        }
        assert_invariants(&set);
        for key in 0..200 {
            let expected_present = key % 7 == 0 || key % 3 != 0;
            assert_eq!(set.contains(key), expected_present, "key {key}");
        }
        assert_eq!(*set.get(21).unwrap(), 1021);
    }
}
