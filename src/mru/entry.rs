//! Entry Module
//!
//! Defines keyed entries stored in the recency chain and the destroy callbacks
//! through which removed values are handed back to the caller.

use std::fmt;

// == Entry ==
/// A single key/value pair owned by a keyed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// Key, duplicated in the container's index
    pub key: K,
    /// The stored value
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

// == Destroy Callbacks ==
/// Receives every key/value pair a keyed container destroys.
pub type DestroyFn<K, V> = Box<dyn FnMut(K, V) + Send>;

/// Receives every item a list container destroys.
pub type DestroyItemFn<T> = Box<dyn FnMut(T) + Send>;

/// Holder for an optional destroy callback.
///
/// Without a callback, destroyed values are simply dropped.
pub struct OnDestroy<F>(Option<F>);

impl<F> Default for OnDestroy<F> {
    fn default() -> Self {
        Self(None)
    }
}

impl<F> OnDestroy<F> {
    pub fn new(callback: F) -> Self {
        Self(Some(callback))
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl<K, V> OnDestroy<DestroyFn<K, V>> {
    pub fn entry(&mut self, key: K, value: V) {
        if let Some(callback) = self.0.as_mut() {
            callback(key, value);
        }
    }
}

impl<T> OnDestroy<DestroyItemFn<T>> {
    pub fn item(&mut self, item: T) {
        if let Some(callback) = self.0.as_mut() {
            callback(item);
        }
    }
}

impl<F> fmt::Debug for OnDestroy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OnDestroy")
            .field(&if self.is_set() { "callback" } else { "none" })
            .finish()
    }
}
