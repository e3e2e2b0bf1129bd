// Session binding.
//
// One scanner exists per logical stream (one live connection), owned by
// its session and never shared or reused across sessions. The registry
// is the only cross-session structure; DashMap sharding keeps creation
// free of cross-session synchronization.

use crate::config::{ConfigError, SegmenterConfig};
use crate::segment::MarkerScanner;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Errors from session lookup and lifecycle.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    /// Lookup of an unknown session id. Never swallowed: proceeding
    /// without the session's scanner would break delivery ordering.
    #[error("no active session with id {0:?}")]
    NotFound(String),
    /// `create` on an id that already has a live handle. Replacing it
    /// silently would leave two handles claiming one logical stream.
    #[error("session {0:?} is already active")]
    AlreadyActive(String),
}

/// State bound to one logical stream.
///
/// The scanner sits behind an async mutex: the emitter locks it for the
/// duration of a stream pump, which is what makes `feed` calls strictly
/// sequential per session.
#[derive(Debug)]
pub struct StreamSession {
    id: String,
    created_at: DateTime<Utc>,
    scanner: Mutex<MarkerScanner>,
}

/// Shared handle to a session.
pub type SessionHandle = Arc<StreamSession>;

impl StreamSession {
    fn new(id: String, marker: &str) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            scanner: Mutex::new(MarkerScanner::new(marker)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The session's scanner. Callers must hold the lock across a whole
    /// stream pump, not per delta.
    pub fn scanner(&self) -> &Mutex<MarkerScanner> {
        &self.scanner
    }
}

/// Registry of active sessions.
///
/// Create when the logical stream begins, destroy when it ends or is
/// cancelled. Destroying discards any pending partial match without
/// flushing it: an aborted stream has no well-defined end state.
pub struct SessionRegistry {
    sessions: DashMap<String, SessionHandle>,
    config: SegmenterConfig,
}

impl SessionRegistry {
    pub fn new(config: SegmenterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sessions: DashMap::new(),
            config,
        })
    }

    /// Register a new session and return its handle.
    pub fn create(&self, id: impl Into<String>) -> Result<SessionHandle, SessionError> {
        let id = id.into();
        match self.sessions.entry(id.clone()) {
            Entry::Occupied(_) => Err(SessionError::AlreadyActive(id)),
            Entry::Vacant(slot) => {
                let handle = Arc::new(StreamSession::new(id.clone(), &self.config.marker));
                slot.insert(handle.clone());
                tracing::debug!(session = %id, "session created");
                Ok(handle)
            }
        }
    }

    /// Look up an active session.
    pub fn get(&self, id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Remove a session, dropping its scanner and any pending buffer.
    pub fn destroy(&self, id: &str) -> Result<(), SessionError> {
        match self.sessions.remove(id) {
            Some(_) => {
                tracing::debug!(session = %id, "session destroyed");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    /// Number of active sessions (for metrics/testing).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
