use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of where the log lives.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be read or written.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// What the backend was doing.
        message: String,
        /// Backend-specific failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
