//! Bounded Cache Module
//!
//! Capacity-bounded, create-on-miss cache with least-recently-used eviction.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::convert::Infallible;
use std::hash::{BuildHasher, Hash};

use tracing::{debug, trace};

use crate::error::{MruError, Result};
use crate::mru::{CacheStats, DestroyFn, Entry, Handle, KeyIndex, OnDestroy, RecencyChain};

// == Bounded Cache ==
/// Create-on-miss cache holding at most `max_capacity` entries.
///
/// Lookups through [`get_or_create`](Self::get_or_create) move the entry to
/// the front of the recency order; when the cache is full, the least recently
/// used entry is evicted and handed to the destroy callback before the new
/// one is created.
///
/// The factory receives the cache itself and may call back into it, for
/// example to build a value out of other cached values. If such a nested call
/// stores the key being created, the outer result is discarded and the
/// nested entry wins.
///
/// ```
/// use mru_collections::BoundedCache;
///
/// let mut cache = BoundedCache::new(2).unwrap();
/// assert_eq!(*cache.get_or_create("a", |_, k| k.len()), 1);
/// cache.get_or_create("bb", |_, k| k.len());
/// cache.get_or_create("ccc", |_, k| k.len());
///
/// assert!(!cache.contains_key("a"));
/// assert_eq!(cache.keys().copied().collect::<Vec<_>>(), ["ccc", "bb"]);
/// ```
#[derive(Debug)]
pub struct BoundedCache<K, V, S = RandomState> {
    chain: RecencyChain<Entry<K, V>>,
    index: KeyIndex<K, S>,
    max_capacity: usize,
    on_destroy: OnDestroy<DestroyFn<K, V>>,
    stats: CacheStats,
}

impl<K, V> BoundedCache<K, V, RandomState>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `max_capacity` entries.
    ///
    /// Fails with [`MruError::InvalidCapacity`] if `max_capacity` is zero.
    pub fn new(max_capacity: usize) -> Result<Self> {
        Self::with_hasher(max_capacity, RandomState::new())
    }
}

impl<K, V, S> BoundedCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Creates an empty cache using `hash_builder` to hash keys.
    pub fn with_hasher(max_capacity: usize, hash_builder: S) -> Result<Self> {
        let max_capacity = MruError::check_capacity(max_capacity)?;
        Ok(Self {
            chain: RecencyChain::new(),
            index: KeyIndex::with_hasher(hash_builder),
            max_capacity,
            on_destroy: OnDestroy::default(),
            stats: CacheStats::new(),
        })
    }

    /// Installs the callback receiving every destroyed key/value pair.
    pub fn with_destroy_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(K, V) + Send + 'static,
    {
        self.on_destroy = OnDestroy::new(Box::new(callback));
        self
    }

    // == Get Or Create ==
    /// Returns the value for `key`, creating it with `factory` on a miss.
    ///
    /// On a hit the entry becomes the most recently used and the factory is
    /// not invoked.
    pub fn get_or_create<F>(&mut self, key: K, factory: F) -> &V
    where
        F: FnOnce(&mut Self, &K) -> V,
    {
        let created = self.get_or_try_create(key, |cache, key| {
            Ok::<V, Infallible>(factory(cache, key))
        });
        match created {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_create`](Self::get_or_create).
    ///
    /// A factory error is returned as-is and nothing is inserted. Eviction
    /// made to free room before the factory ran is not undone.
    pub fn get_or_try_create<F, E>(&mut self, key: K, factory: F) -> std::result::Result<&V, E>
    where
        F: FnOnce(&mut Self, &K) -> std::result::Result<V, E>,
    {
        if let Some(handle) = self.index.get(&key) {
            self.chain.move_to_front(handle);
            self.stats.record_hit();
            return Ok(&self.live(handle).value);
        }

        self.stats.record_miss();
        self.make_room();

        let value = factory(self, &key)?;

        // The factory may have re-entered and stored this key already
        if let Some(handle) = self.index.get(&key) {
            debug!("Key created by reentrant call, discarding factory result");
            self.stats.record_discard();
            self.destroy(key, value);
            self.chain.move_to_front(handle);
            return Ok(&self.live(handle).value);
        }

        // ...or refilled the cache while we were waiting
        self.make_room();
        let handle = self.insert_front(key, value);
        Ok(&self.live(handle).value)
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(handle) => {
                self.chain.move_to_front(handle);
                self.stats.record_hit();
                self.chain.get(handle).map(|entry| &entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Returns the value for `key` without touching recency or statistics.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.get(key)?;
        self.chain.get(handle).map(|entry| &entry.value)
    }

    // == Set ==
    /// Stores `value` under `key` as the most recently used entry.
    ///
    /// A replaced value goes to the destroy callback. The factory path is
    /// never involved.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(handle) = self.index.get(&key) {
            let old = std::mem::replace(&mut self.live_mut(handle).value, value);
            self.chain.move_to_front(handle);
            self.destroy(key, old);
            return;
        }

        self.make_room();
        self.insert_front(key, value);
    }

    // == Remove ==
    /// Destroys the entry for `key`.
    ///
    /// Returns false if the key was not present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(handle) = self.index.remove(key) else {
            return false;
        };
        let Some(entry) = self.chain.unlink(handle) else {
            debug_assert!(false, "indexed handle missing from chain");
            return false;
        };

        self.stats.set_total_entries(self.index.len());
        let (key, value) = entry.into_parts();
        self.destroy(key, value);
        self.check_consistency();
        true
    }

    // == Clear ==
    /// Destroys every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        for entry in self.chain.drain() {
            let (key, value) = entry.into_parts();
            self.destroy(key, value);
        }
        self.stats.set_total_entries(0);
    }

    // == Capacity ==
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Changes the capacity bound, evicting from the tail until it holds.
    pub fn set_max_capacity(&mut self, max_capacity: usize) -> Result<()> {
        self.max_capacity = MruError::check_capacity(max_capacity)?;
        trace!(max_capacity, len = self.len(), "Capacity changed");

        while self.index.len() > self.max_capacity {
            if !self.evict_lru() {
                break;
            }
        }
        Ok(())
    }

    // == Inspection ==
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(key)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.chain.iter().map(|(_, entry)| &entry.key)
    }

    /// Entries from most to least recently used.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + '_ {
        self.chain.iter().map(|(_, entry)| (&entry.key, &entry.value))
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats;
        stats.set_total_entries(self.len());
        stats
    }

    // == Internals ==
    fn make_room(&mut self) {
        while self.index.len() >= self.max_capacity {
            if !self.evict_lru() {
                break;
            }
        }
    }

    fn evict_lru(&mut self) -> bool {
        let Some(entry) = self.chain.pop_back() else {
            return false;
        };
        let removed = self.index.remove(&entry.key);
        debug_assert!(removed.is_some(), "evicted entry was not indexed");

        self.stats.record_eviction();
        self.stats.set_total_entries(self.index.len());
        debug!(len = self.index.len(), "Evicted least recently used entry");

        let (key, value) = entry.into_parts();
        self.destroy(key, value);
        self.check_consistency();
        true
    }

    fn insert_front(&mut self, key: K, value: V) -> Handle {
        let handle = self.chain.push_front(Entry::new(key.clone(), value));
        self.index.insert(key, handle);
        self.stats.set_total_entries(self.index.len());
        self.check_consistency();
        handle
    }

    fn destroy(&mut self, key: K, value: V) {
        self.stats.record_destroyed();
        self.on_destroy.entry(key, value);
    }

    fn live(&self, handle: Handle) -> &Entry<K, V> {
        match self.chain.get(handle) {
            Some(entry) => entry,
            None => unreachable!("indexed handle is not live"),
        }
    }

    fn live_mut(&mut self, handle: Handle) -> &mut Entry<K, V> {
        match self.chain.get_mut(handle) {
            Some(entry) => entry,
            None => unreachable!("indexed handle is not live"),
        }
    }

    fn check_consistency(&self) {
        debug_assert_eq!(
            self.index.len(),
            self.chain.len(),
            "key index and recency chain out of sync"
        );
    }
}
