/// Persisted session models.
pub mod models;
/// Session log backends.
pub mod session_store;
/// Storage abstraction layer for the session log.
pub mod storage;
