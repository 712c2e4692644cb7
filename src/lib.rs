//! # Ordered collections backed by a plain binary search tree
//!
//! `bst-collections` provides [`BstMap`] and [`BstSet`], ordered containers
//! built on an unbalanced binary search tree.  There is no rebalancing: the
//! tree's shape is whatever the insertion order produces, so operations are
//! O(height), which is O(n) in the worst case.  In exchange, the containers
//! support a pluggable comparator (any [`compare::Compare`] instance, with
//! natural ordering as the default), a full predecessor/successor query
//! family, and double-ended iteration over the whole container or over an
//! arbitrary key range.  If you need guaranteed logarithmic operations, use
//! `std::collections::BTreeMap` instead.

#![warn(missing_docs)]

mod iter;
mod node;

pub mod map;
pub mod set;

pub use map::BstMap;
pub use set::BstSet;

#[cfg(feature = "quickcheck")]
mod arbitrary;
