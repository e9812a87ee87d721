//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a shared cache.
//!
//! # Tasks
//! - Stats Reporter: Logs bounded cache statistics at configured intervals

mod report;

pub use report::spawn_stats_reporter;
