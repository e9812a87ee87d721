//! Response DTOs for the document session
//!
//! Defines the structure of outgoing JSON-line responses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::mru::CacheStats;

/// Open document as reported to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    /// Document name
    pub name: String,
    /// Resource handle assigned when the document was opened
    pub handle: u64,
    /// When the document was opened
    pub opened_at: DateTime<Utc>,
}

/// Response to the `open` command
#[derive(Debug, Clone, Serialize)]
pub struct OpenResponse {
    /// The opened document
    pub document: DocumentInfo,
    /// True if the document was already open and got reused
    pub reused: bool,
}

/// Response to the `list` command, most recently used first
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub documents: Vec<DocumentInfo>,
}

/// Response to the `recent` command, most recently used first
#[derive(Debug, Clone, Serialize)]
pub struct RecentResponse {
    pub names: Vec<String>,
}

/// Plain acknowledgement for `touch`, `close` and `resize`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response to the `stats` command
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Counters from the document cache
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Configured capacity
    pub max_capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: CacheStats, max_capacity: usize) -> Self {
        Self {
            stats,
            max_capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Any response a session can write
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SessionResponse {
    Open(OpenResponse),
    List(ListResponse),
    Recent(RecentResponse),
    Message(MessageResponse),
    Stats(StatsResponse),
    Error(ErrorResponse),
}
