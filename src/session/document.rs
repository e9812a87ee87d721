//! Document Module
//!
//! Value type stored in the session's document cache.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::models::DocumentInfo;

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

// == Document ==
/// An open document holding a (simulated) resource handle.
///
/// The handle is released by the cache's destroy callback when the document
/// is closed, evicted or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub handle: u64,
    pub opened_at: DateTime<Utc>,
}

impl Document {
    /// Opens `name`, acquiring a fresh handle.
    pub fn open(name: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: NEXT_HANDLE.fetch_add(1, Ordering::Relaxed),
            opened_at: Utc::now(),
        }
    }

    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            name: self.name.clone(),
            handle: self.handle,
            opened_at: self.opened_at,
        }
    }
}
