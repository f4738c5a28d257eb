//! An in-process [`SessionStore`] backed by a `HashMap`.
//!
//! Used by the test suites and for running the server locally without a
//! database. The guarded write holds the map lock across the status check
//! and the patch, which gives the same all-or-nothing behavior as a
//! conditional `UPDATE ... WHERE status = 'in_progress'`.

use std::collections::HashMap;

use gamegate_protocol::GameSessionId;
use tokio::sync::Mutex;

use crate::{
    GameSession, SessionError, SessionSnapshot, SessionStore, SessionUpdate,
    UpdateOutcome,
};

/// Game session rows held in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<GameSessionId, GameSession>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `sessions`.
    pub fn with_sessions(sessions: impl IntoIterator<Item = GameSession>) -> Self {
        let sessions = sessions
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        Self {
            sessions: Mutex::new(sessions),
        }
    }

    /// Inserts or replaces a row.
    pub async fn insert(&self, session: GameSession) {
        self.sessions.lock().await.insert(session.id.clone(), session);
    }

    /// Returns a copy of the full row.
    pub async fn get(&self, id: &GameSessionId) -> Option<GameSession> {
        self.sessions.lock().await.get(id).cloned()
    }

    /// Number of rows.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Returns `true` if there are no rows.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    async fn fetch(
        &self,
        id: &GameSessionId,
    ) -> Result<Option<SessionSnapshot>, SessionError> {
        Ok(self.sessions.lock().await.get(id).map(GameSession::snapshot))
    }

    async fn update_in_progress(
        &self,
        id: &GameSessionId,
        update: &SessionUpdate,
    ) -> Result<UpdateOutcome, SessionError> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(id) {
            Some(session) if session.status.is_in_progress() => {
                session.apply(update);
                tracing::debug!(session_id = %id, "memory store applied update");
                Ok(UpdateOutcome::Applied)
            }
            _ => Ok(UpdateOutcome::NotInProgress),
        }
    }
}
