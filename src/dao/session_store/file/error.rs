//! Error types shared by the file-backed session log.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Convenient result alias returning [`FileStoreError`] failures.
pub type FileStoreResult<T> = Result<T, FileStoreError>;

/// Failures that can occur while reading or writing the log file.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// The log file exists but could not be read.
    #[error("failed to read session log `{path}`")]
    Read {
        /// Location of the log file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The log file does not contain a JSON array of sessions.
    #[error("session log `{path}` is not valid JSON")]
    Decode {
        /// Location of the log file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },
    /// Sessions could not be encoded.
    #[error("failed to encode session log")]
    Encode {
        /// Serializer failure.
        #[source]
        source: serde_json::Error,
    },
    /// Writing the log (or creating its directory) failed.
    #[error("failed to write session log `{path}`")]
    Write {
        /// Location the log was being written to.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}
