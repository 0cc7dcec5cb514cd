use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture};

use crate::dao::{
    models::{GameSessionEntity, upsert_session},
    session_store::SessionStore,
    storage::StorageResult,
};

/// Session log that lives only as long as the process.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<Vec<GameSessionEntity>>>,
}

impl InMemorySessionStore {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn save_session(&self, session: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        upsert_session(&mut sessions, session);
        Box::pin(future::ready(Ok(())))
    }

    fn list_sessions(&self) -> BoxFuture<'static, StorageResult<Vec<GameSessionEntity>>> {
        let sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        Box::pin(future::ready(Ok(sessions)))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(future::ready(Ok(())))
    }
}
