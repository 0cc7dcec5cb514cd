//! Best-effort session log. Storage failures are logged and swallowed here so
//! the game itself never sees them.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::dao::{models::GameSessionEntity, session_store::SessionStore};

/// Records session snapshots without ever failing the caller.
#[derive(Clone)]
pub struct SessionRecorder {
    store: Arc<dyn SessionStore>,
}

impl SessionRecorder {
    /// Wrap a storage backend.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Backend behind the recorder, for health checks.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Upsert `session` by id.
    pub async fn save_session(&self, session: GameSessionEntity) {
        let session_id = session.id.clone();
        match self.store.save_session(session).await {
            Ok(()) => debug!(%session_id, "session recorded"),
            Err(err) => warn!(%session_id, error = %err, "failed to record session; continuing"),
        }
    }

    /// Every recorded session, most recent first; empty when the log cannot be read.
    pub async fn get_sessions(&self) -> Vec<GameSessionEntity> {
        match self.store.list_sessions().await {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!(error = %err, "failed to read session log; returning no sessions");
                Vec::new()
            }
        }
    }

    /// Recorded session with the given id.
    pub async fn get_session_by_id(&self, id: &str) -> Option<GameSessionEntity> {
        self.get_sessions()
            .await
            .into_iter()
            .find(|session| session.id == id)
    }
}
