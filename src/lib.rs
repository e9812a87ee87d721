//! MRU Collections - Recency-ordered containers
//!
//! Provides a bounded create-on-miss cache with least-recently-used
//! eviction, a key/value map reordered by use, and a list keeping both
//! insertion order and recency order.

pub mod config;
pub mod error;
pub mod models;
pub mod mru;
pub mod session;
pub mod sync;
pub mod tasks;

pub use config::Config;
pub use error::{MruError, Result};
pub use mru::{BoundedCache, CacheStats, DualOrderList, MruView, TouchableMap};
pub use sync::Shared;
pub use tasks::spawn_stats_reporter;
