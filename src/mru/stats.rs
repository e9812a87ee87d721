//! Cache Statistics Module
//!
//! Tracks bounded cache activity: hits, misses, evictions and destroyed entries.

use serde::Serialize;

// == Cache Stats ==
/// Counters kept by [`BoundedCache`](crate::mru::BoundedCache).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that found an existing entry
    pub hits: u64,
    /// Lookups that had to create (or failed to find) an entry
    pub misses: u64,
    /// Entries removed to stay within the capacity bound
    pub evictions: u64,
    /// Entries handed to the destroy callback for any reason
    pub destroyed: u64,
    /// Factory results dropped because a reentrant call created the key first
    pub discarded: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_destroyed(&mut self) {
        self.destroyed += 1;
    }

    pub fn record_discard(&mut self) {
        self.discarded += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
