//! # Sparse Storage
//!
//! Dual-array containers keyed by small unsigned integers.
//!
//! ## Design Philosophy
//!
//! - `sparse[key]` holds a position into the dense arrays, or a sentinel
//! - `dense` and `values` are packed with no holes
//! - Removal swaps the last entry into the vacated slot, so packing order
//!   is never stable across a removal

mod key;
mod sparse_set;

pub use key::SparseKey;
pub use sparse_set::SparseSet;
