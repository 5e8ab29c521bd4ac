//! Storage trait definitions

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence backend for a store's snapshot.
///
/// Stores call an adapter only from explicit load and flush operations; reads
/// and writes against the in-memory state never touch it.
#[async_trait::async_trait]
pub trait SnapshotAdapter: Send + Sync {
    /// Load the last saved snapshot, or `None` if nothing was saved yet
    async fn load<T>(&self) -> StorageResult<Option<T>>
    where
        T: DeserializeOwned + Send;

    /// Replace the saved snapshot
    async fn save<T>(&self, snapshot: &T) -> StorageResult<()>
    where
        T: Serialize + Send + Sync;
}
