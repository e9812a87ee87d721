//! Error types for the MRU containers
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == MRU Error Enum ==
/// Unified error type for the recency-ordered containers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MruError {
    /// Capacity bound below the minimum of one entry
    #[error("Invalid argument: max capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    /// Strict accessor called with a key that is not present
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Add of a key that is already present
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Positional access outside of `0..len` (or `0..=len` for insertion)
    #[error("Index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl MruError {
    /// Validates a capacity bound, rejecting values below one.
    pub fn check_capacity(max_capacity: usize) -> Result<usize> {
        if max_capacity < 1 {
            return Err(MruError::InvalidCapacity(max_capacity));
        }
        Ok(max_capacity)
    }
}

// == Result Type Alias ==
/// Convenience Result type for the containers.
pub type Result<T> = std::result::Result<T, MruError>;
