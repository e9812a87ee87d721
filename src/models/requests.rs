//! Command DTOs for the document session
//!
//! Defines the structure of incoming JSON-line commands.

use serde::Deserialize;

/// Maximum allowed document name length in bytes
pub const MAX_NAME_LENGTH: usize = 256;

/// One session command, tagged by its `op` field.
///
/// # Examples
/// - `{"op": "open", "name": "notes.txt"}`
/// - `{"op": "resize", "capacity": 4}`
/// - `{"op": "list"}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Open a document, reusing it if already open
    Open { name: String },
    /// Mark an open document as most recently used
    Touch { name: String },
    /// Close an open document
    Close { name: String },
    /// Open documents, most recently used first
    List,
    /// Recently used names, including closed documents
    Recent,
    /// Cache statistics
    Stats,
    /// Change how many documents may stay open
    Resize { capacity: usize },
}

impl SessionCommand {
    /// Validates the command data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self {
            SessionCommand::Open { name }
            | SessionCommand::Touch { name }
            | SessionCommand::Close { name } => {
                if name.is_empty() {
                    return Some("Name cannot be empty".to_string());
                }
                if name.len() > MAX_NAME_LENGTH {
                    return Some(format!(
                        "Name exceeds maximum length of {} bytes",
                        MAX_NAME_LENGTH
                    ));
                }
                None
            }
            _ => None,
        }
    }
}
