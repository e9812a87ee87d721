//! Session Module
//!
//! Line-oriented document session over a shared bounded cache.
//!
//! # Commands
//! - `open` - Open a document (create-on-miss), evicting the least recently used
//! - `touch` - Mark an open document as most recently used
//! - `close` - Close an open document
//! - `list` - Open documents in recency order
//! - `recent` - Recently used names in recency order
//! - `stats` - Document cache statistics
//! - `resize` - Change the open document capacity

mod document;
pub mod handlers;

pub use document::Document;
pub use handlers::{handle_command, handle_line, SessionState};
