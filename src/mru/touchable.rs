//! Touchable Map Module
//!
//! Dictionary iterated in recency order, where reads never reorder and
//! writes or explicit touches move an entry to the front.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};
use std::ops::Index;

use tracing::{debug, trace};

use crate::error::{MruError, Result};
use crate::mru::{DestroyFn, Entry, Handle, KeyIndex, OnDestroy, RecencyChain};

// == Touchable Map ==
/// Hash map whose iteration order is recency order.
///
/// `get` and `Index` are plain reads and leave the order alone. `insert`,
/// `set` and `touch` put the entry at the front. With a capacity bound set,
/// the entries touched longest ago are evicted first.
#[derive(Debug)]
pub struct TouchableMap<K, V, S = RandomState> {
    chain: RecencyChain<Entry<K, V>>,
    index: KeyIndex<K, S>,
    max_capacity: Option<usize>,
    on_destroy: OnDestroy<DestroyFn<K, V>>,
}

impl<K, V> TouchableMap<K, V, RandomState>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty, unbounded map.
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty map holding at most `max_capacity` entries.
    pub fn with_max_capacity(max_capacity: usize) -> Result<Self> {
        let mut map = Self::new();
        map.set_max_capacity(Some(max_capacity))?;
        Ok(map)
    }
}

impl<K, V> Default for TouchableMap<K, V, RandomState>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> TouchableMap<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            chain: RecencyChain::new(),
            index: KeyIndex::with_hasher(hash_builder),
            max_capacity: None,
            on_destroy: OnDestroy::default(),
        }
    }

    /// Installs the callback receiving every destroyed key/value pair.
    pub fn with_destroy_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(K, V) + Send + 'static,
    {
        self.on_destroy = OnDestroy::new(Box::new(callback));
        self
    }

    // == Insert ==
    /// Adds a new key at the front of the recency order.
    ///
    /// Fails with [`MruError::DuplicateKey`] if the key is already present;
    /// use [`set`](Self::set) to overwrite.
    pub fn insert(&mut self, key: K, value: V) -> Result<()>
    where
        K: Debug,
    {
        if self.index.contains(&key) {
            return Err(MruError::DuplicateKey(format!("{key:?}")));
        }
        self.insert_front(key, value);
        Ok(())
    }

    // == Set ==
    /// Indexed write: stores `value` and moves the entry to the front.
    ///
    /// Unlike reads, a write always reorders. A replaced value goes to the
    /// destroy callback.
    pub fn set(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(handle) => {
                let old = match self.chain.get_mut(handle) {
                    Some(entry) => std::mem::replace(&mut entry.value, value),
                    None => unreachable!("indexed handle is not live"),
                };
                self.chain.move_to_front(handle);
                self.on_destroy.entry(key, old);
            }
            None => self.insert_front(key, value),
        }
    }

    // == Read ==
    /// Returns the value for `key` without changing the recency order.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.get(key)?;
        self.chain.get(handle).map(|entry| &entry.value)
    }

    /// Strict read, failing with [`MruError::KeyNotFound`] for a missing key.
    pub fn lookup<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.get(key)
            .ok_or_else(|| MruError::KeyNotFound(format!("{key:?}")))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(key)
    }

    // == Touch ==
    /// Moves `key` to the front of the recency order.
    ///
    /// Returns false if the key is absent.
    pub fn touch<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(handle) => self.chain.move_to_front(handle),
            None => false,
        }
    }

    // == Remove ==
    /// Destroys the entry for `key`; false if it was absent.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.unlink(key) {
            Some((key, value)) => {
                self.on_destroy.entry(key, value);
                true
            }
            None => false,
        }
    }

    /// Removes the entry for `key` and returns its value to the caller.
    ///
    /// The destroy callback is not invoked since ownership goes back to the
    /// caller directly.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.unlink(key).map(|(_, value)| value)
    }

    /// Destroys every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        for entry in self.chain.drain() {
            let (key, value) = entry.into_parts();
            self.on_destroy.entry(key, value);
        }
    }

    // == Capacity ==
    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    /// Sets or lifts the capacity bound, evicting from the tail as needed.
    pub fn set_max_capacity(&mut self, max_capacity: Option<usize>) -> Result<()> {
        if let Some(max_capacity) = max_capacity {
            MruError::check_capacity(max_capacity)?;
        }
        self.max_capacity = max_capacity;
        trace!(?max_capacity, len = self.len(), "Capacity changed");
        self.enforce_capacity();
        Ok(())
    }

    // == Inspection ==
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Most recently touched entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.chain
            .peek_front()
            .map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Least recently touched entry, the next eviction candidate.
    pub fn back(&self) -> Option<(&K, &V)> {
        self.chain
            .peek_back()
            .map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Entries from most to least recently touched.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.chain.iter(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    // == Internals ==
    fn insert_front(&mut self, key: K, value: V) {
        let handle: Handle = self.chain.push_front(Entry::new(key.clone(), value));
        self.index.insert(key, handle);
        self.enforce_capacity();
        debug_assert_eq!(self.index.len(), self.chain.len());
    }

    fn unlink<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.remove(key)?;
        let entry = self.chain.unlink(handle);
        debug_assert!(entry.is_some(), "indexed handle missing from chain");
        entry.map(Entry::into_parts)
    }

    fn enforce_capacity(&mut self) {
        let Some(max_capacity) = self.max_capacity else {
            return;
        };
        while self.index.len() > max_capacity {
            let Some(entry) = self.chain.pop_back() else {
                break;
            };
            self.index.remove(&entry.key);
            debug!(len = self.index.len(), "Evicted least recently touched entry");
            let (key, value) = entry.into_parts();
            self.on_destroy.entry(key, value);
        }
    }
}

impl<K, Q, V, S> Index<&Q> for TouchableMap<K, V, S>
where
    K: Hash + Eq + Clone + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if the key is not present, like `HashMap`.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in TouchableMap"),
        }
    }
}

// == Iterator ==
/// Recency-order iterator over a [`TouchableMap`].
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    inner: crate::mru::chain::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(_, entry)| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|(_, entry)| (&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a TouchableMap<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
