//! Configuration Module
//!
//! Handles loading and managing session configuration from environment variables.

use std::env;

use crate::error::{MruError, Result};

/// Session configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of documents kept open in the bounded cache
    pub max_capacity: usize,
    /// Stats reporter interval in seconds
    pub report_interval: u64,
    /// Maximum number of names kept in the recent list
    pub recent_limit: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MRU_MAX_CAPACITY` - Open document capacity (default: 8)
    /// - `MRU_REPORT_INTERVAL` - Stats reporting frequency in seconds (default: 30)
    /// - `MRU_RECENT_LIMIT` - Recent list length (default: 16)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_capacity: env::var("MRU_MAX_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_capacity),
            report_interval: env::var("MRU_REPORT_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.report_interval),
            recent_limit: env::var("MRU_RECENT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.recent_limit),
        }
    }

    /// Rejects capacity bounds the containers would refuse.
    pub fn validate(&self) -> Result<()> {
        MruError::check_capacity(self.max_capacity)?;
        MruError::check_capacity(self.recent_limit)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_capacity: 8,
            report_interval: 30,
            recent_limit: 16,
        }
    }
}
