//! Session state and its store
//!
//! Sessions are created lazily and live for the lifetime of the process.
//! Each one sits behind its own async mutex so a single user's events are
//! handled one at a time while other users proceed independently.

use crate::catalog::CatalogEntry;
use crate::models::UserId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Where a user is in the flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Unstarted,
    Started,
    AwaitingSelection,
    AwaitingPhoto { item: CatalogEntry },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unstarted => "unstarted",
            SessionState::Started => "started",
            SessionState::AwaitingSelection => "awaiting_selection",
            SessionState::AwaitingPhoto { .. } => "awaiting_photo",
        }
    }

    /// Identifier of the landmark the user is expected to photograph
    pub fn selected_item(&self) -> Option<&str> {
        match self {
            SessionState::AwaitingPhoto { item } => Some(item.id.as_str()),
            _ => None,
        }
    }
}

/// Shared handle to one user's session
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// Trait for session storage
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Handle for `user`, creating an unstarted session on first use
    async fn session(&self, user: UserId) -> SessionHandle;

    /// Current state without creating a session
    async fn snapshot(&self, user: UserId) -> Option<SessionState>;

    async fn len(&self) -> usize;
}

/// In-memory session store
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<UserId, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {

    async fn session(&self, user: UserId) -> SessionHandle {

        // Fast path: already known
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(&user) {
                return handle.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(SessionState::default())))
            .clone()
    }

    async fn snapshot(&self, user: UserId) -> Option<SessionState> {
        let handle = {
            let sessions = self.sessions.read().await;
            sessions.get(&user).cloned()
        }?;

        let state = handle.lock().await;
        Some(state.clone())
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
