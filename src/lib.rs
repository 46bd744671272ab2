#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A fixed-capacity double-ended queue backed by inline storage.
///
/// This module provides an `ArrayDeque` that never allocates and reports
/// rejected values back to the caller when full.
pub mod array_deque;

/// A HashMap implementation using Robin Hood hashing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

pub mod hash_table;

/// A hash set implementation using Robin Hood hashing.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

/// A slot map handing out stable keyed handles to densely stored values.
///
/// This module provides a `SlotMap` whose handles stay valid across
/// insertions and removals of other values.
pub mod slot_map;

#[cfg(all(test, feature = "std"))]
mod hash_map_proptest;

pub use array_deque::ArrayDeque;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use slot_map::SlotMap;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Default hasher builder for [`HashMap`] and [`HashSet`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Default hasher builder for [`HashMap`] and [`HashSet`].
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        /// Placeholder hasher builder used when neither the `std` nor the
        /// `foldhash` feature is enabled. It cannot be constructed; use the
        /// `with_hasher` constructors to supply a hasher instead.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}
