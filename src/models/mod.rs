//! Command and Response models for the document session
//!
//! This module defines the JSON-line messages read from and written to a
//! session: one command object per input line, one response per output line.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{SessionCommand, MAX_NAME_LENGTH};
pub use responses::{
    DocumentInfo, ErrorResponse, ListResponse, MessageResponse, OpenResponse, RecentResponse,
    SessionResponse, StatsResponse,
};
