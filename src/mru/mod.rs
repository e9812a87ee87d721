//! MRU Module
//!
//! Recency-ordered containers built from two leaves: a [`RecencyChain`]
//! keeping entries in most-recently-used order, and a [`KeyIndex`] giving
//! O(1) lookup of an entry's handle by key.

mod bounded;
mod chain;
mod dual;
mod entry;
mod index;
mod stats;
mod touchable;


// Re-export public types
pub use bounded::BoundedCache;
pub use chain::{Handle, Iter as ChainIter, RecencyChain};
pub use dual::{DualOrderList, MruView};
pub use entry::{DestroyFn, DestroyItemFn, Entry, OnDestroy};
pub use index::KeyIndex;
pub use stats::CacheStats;
pub use touchable::{Iter as TouchableIter, TouchableMap};
