//! Key Index Module
//!
//! Hash lookup from key to the handle of its entry in a recency chain.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use crate::mru::Handle;

// == Key Index ==
/// Maps keys to chain handles.
///
/// The hashing strategy is the `S` parameter, so callers can swap the default
/// SipHash builder for any other `BuildHasher`.
#[derive(Debug, Clone)]
pub struct KeyIndex<K, S = RandomState> {
    map: HashMap<K, Handle, S>,
}

impl<K, S> KeyIndex<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            map: HashMap::with_hasher(hash_builder),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Registers a key that must not already be indexed.
    pub fn insert(&mut self, key: K, handle: Handle) {
        let previous = self.map.insert(key, handle);
        debug_assert!(previous.is_none(), "key indexed twice");
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
