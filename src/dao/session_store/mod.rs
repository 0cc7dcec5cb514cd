pub mod file;
pub mod memory;

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::info;

use crate::{
    config::AppConfig,
    dao::{models::GameSessionEntity, storage::StorageResult},
};

/// Narrow persistence interface behind the session log.
pub trait SessionStore: Send + Sync {
    /// Upsert a session by id; new sessions go first.
    fn save_session(&self, session: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Every stored session, most recent first.
    fn list_sessions(&self) -> BoxFuture<'static, StorageResult<Vec<GameSessionEntity>>>;
    /// Check that the backend can still be read.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Backend selected by the configuration: the JSON file when a path is set,
/// process memory otherwise.
pub fn from_config(config: &AppConfig) -> Arc<dyn SessionStore> {
    match config.sessions_path() {
        Some(path) => {
            info!(path = %path.display(), "recording sessions to file");
            Arc::new(file::FileSessionStore::new(path.clone()))
        }
        None => {
            info!("recording sessions in memory");
            Arc::new(memory::InMemorySessionStore::new())
        }
    }
}
