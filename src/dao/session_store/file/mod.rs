//! Session log kept as a single JSON document on the local disk.

mod error;
mod store;

pub use error::{FileStoreError, FileStoreResult};
pub use store::FileSessionStore;
