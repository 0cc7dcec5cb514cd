use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use tokio::{fs, sync::Mutex};

use crate::dao::{
    models::{GameSessionEntity, upsert_session},
    session_store::SessionStore,
    storage::{StorageError, StorageResult},
};

use super::error::{FileStoreError, FileStoreResult};

/// Session log stored as one JSON array in a file.
///
/// Writes go through a sibling temporary file that is renamed over the log, so
/// a crash mid-write leaves the previous log intact.
#[derive(Clone)]
pub struct FileSessionStore {
    path: Arc<Path>,
    write_lock: Arc<Mutex<()>>,
}

impl FileSessionStore {
    /// Use the log file at `path`; it is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        Self {
            path: Arc::from(path),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(path: &Path) -> FileStoreResult<Vec<GameSessionEntity>> {
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(FileStoreError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|source| FileStoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    async fn write_all(path: &Path, sessions: &[GameSessionEntity]) -> FileStoreResult<()> {
        let payload =
            serde_json::to_vec_pretty(sessions).map_err(|source| FileStoreError::Encode { source })?;

        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| FileStoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, payload)
            .await
            .map_err(|source| FileStoreError::Write {
                path: staging.clone(),
                source,
            })?;
        fs::rename(&staging, path)
            .await
            .map_err(|source| FileStoreError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl SessionStore for FileSessionStore {
    fn save_session(&self, session: GameSessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path.clone();
        let lock = self.write_lock.clone();
        Box::pin(async move {
            let _guard = lock.lock().await;
            let mut sessions = Self::read_all(&path).await.map_err(into_storage)?;
            upsert_session(&mut sessions, session);
            Self::write_all(&path, &sessions).await.map_err(into_storage)
        })
    }

    fn list_sessions(&self) -> BoxFuture<'static, StorageResult<Vec<GameSessionEntity>>> {
        let path = self.path.clone();
        Box::pin(async move { Self::read_all(&path).await.map_err(into_storage) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path.clone();
        Box::pin(async move {
            Self::read_all(&path)
                .await
                .map(|_| ())
                .map_err(into_storage)
        })
    }
}

fn into_storage(err: FileStoreError) -> StorageError {
    StorageError::unavailable(err.to_string(), err)
}
