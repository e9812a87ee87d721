//! Session Handlers
//!
//! Command handlers for the document session.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{MruError, Result};
use crate::models::{
    ErrorResponse, ListResponse, MessageResponse, OpenResponse, RecentResponse, SessionCommand,
    SessionResponse, StatsResponse,
};
use crate::mru::{BoundedCache, TouchableMap};
use crate::session::Document;
use crate::sync::Shared;

/// State shared by every command of a session.
///
/// Both containers sit behind [`Shared`] so the stats reporter can read the
/// document cache while commands are being handled.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Open documents, bounded, closed on eviction
    pub documents: Shared<BoundedCache<String, Document>>,
    /// Names in order of last use, with the time of that use
    pub recent: Shared<TouchableMap<String, DateTime<Utc>>>,
}

impl SessionState {
    /// Creates a new SessionState with the given containers.
    pub fn new(
        documents: BoundedCache<String, Document>,
        recent: TouchableMap<String, DateTime<Utc>>,
    ) -> Self {
        Self {
            documents: Shared::new(documents),
            recent: Shared::new(recent),
        }
    }

    /// Creates a new SessionState from configuration.
    ///
    /// Documents leaving the cache are closed through its destroy callback.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let documents = BoundedCache::new(config.max_capacity)?.with_destroy_callback(
            |name: String, document: Document| {
                info!(name = %name, handle = document.handle, "Closed document");
            },
        );
        let recent = TouchableMap::with_max_capacity(config.recent_limit)?;
        Ok(Self::new(documents, recent))
    }
}

/// Executes one validated command.
pub async fn handle_command(
    state: &SessionState,
    command: SessionCommand,
) -> Result<SessionResponse> {
    match command {
        SessionCommand::Open { name } => {
            let (document, reused) = state
                .documents
                .with(|cache| {
                    let reused = cache.contains_key(name.as_str());
                    let document = cache
                        .get_or_create(name.clone(), |_, name| Document::open(name))
                        .info();
                    (document, reused)
                })
                .await;
            state.recent.with(|recent| recent.set(name, Utc::now())).await;

            Ok(SessionResponse::Open(OpenResponse { document, reused }))
        }
        SessionCommand::Touch { name } => {
            let found = state
                .documents
                .with(|cache| cache.get(name.as_str()).is_some())
                .await;
            if !found {
                return Err(MruError::KeyNotFound(format!("{name:?}")));
            }
            let message = format!("Document '{}' touched", name);
            state.recent.with(|recent| recent.set(name, Utc::now())).await;

            Ok(SessionResponse::Message(MessageResponse::new(message)))
        }
        SessionCommand::Close { name } => {
            let closed = state
                .documents
                .with(|cache| cache.remove(name.as_str()))
                .await;
            if !closed {
                return Err(MruError::KeyNotFound(format!("{name:?}")));
            }

            Ok(SessionResponse::Message(MessageResponse::new(format!(
                "Document '{}' closed",
                name
            ))))
        }
        SessionCommand::List => {
            let documents = state
                .documents
                .with(|cache| cache.iter().map(|(_, document)| document.info()).collect())
                .await;

            Ok(SessionResponse::List(ListResponse { documents }))
        }
        SessionCommand::Recent => {
            let names = state
                .recent
                .with(|recent| recent.keys().cloned().collect())
                .await;

            Ok(SessionResponse::Recent(RecentResponse { names }))
        }
        SessionCommand::Stats => {
            let stats = state
                .documents
                .with(|cache| StatsResponse::new(cache.stats(), cache.max_capacity()))
                .await;

            Ok(SessionResponse::Stats(stats))
        }
        SessionCommand::Resize { capacity } => {
            state
                .documents
                .with(|cache| cache.set_max_capacity(capacity))
                .await?;

            Ok(SessionResponse::Message(MessageResponse::new(format!(
                "Capacity set to {}",
                capacity
            ))))
        }
    }
}

/// Parses, validates and executes one JSON command line.
///
/// Always produces a single JSON line; failures become `{"error": ...}`.
pub async fn handle_line(state: &SessionState, line: &str) -> String {
    let response = match serde_json::from_str::<SessionCommand>(line) {
        Ok(command) => {
            debug!(?command, "Handling command");
            match command.validate() {
                Some(error_msg) => {
                    SessionResponse::Error(ErrorResponse::new(format!("Invalid command: {}", error_msg)))
                }
                None => match handle_command(state, command).await {
                    Ok(response) => response,
                    Err(err) => {
                        warn!(error = %err, "Command failed");
                        SessionResponse::Error(ErrorResponse::new(err.to_string()))
                    }
                },
            }
        }
        Err(err) => SessionResponse::Error(ErrorResponse::new(format!("Invalid command: {}", err))),
    };

    match serde_json::to_string(&response) {
        Ok(json) => json,
        Err(err) => {
            warn!(error = %err, "Failed to encode response");
            r#"{"error":"Failed to encode response"}"#.to_string()
        }
    }
}
