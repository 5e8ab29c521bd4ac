//! Snapshot adapters

use crate::traits::{SnapshotAdapter, StorageError, StorageResult};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Snapshot stored as pretty-printed JSON in a single file.
///
/// Saves go to `<path>.tmp` first and are renamed over the target, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Removes the temp file unless the rename went through
struct TempFileGuard {
    path: PathBuf,
    committed: bool,
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn write_atomically(target: &Path, contents: &[u8]) -> StorageResult<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp = target.as_os_str().to_owned();
    temp.push(".tmp");
    let mut guard = TempFileGuard {
        path: PathBuf::from(temp),
        committed: false,
    };

    let mut file = File::create(&guard.path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&guard.path, target)?;
    guard.committed = true;
    Ok(())
}

#[async_trait::async_trait]
impl SnapshotAdapter for JsonFileSnapshot {
    async fn load<T>(&self) -> StorageResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        if !self.path.exists() {
            debug!("No snapshot at {:?}", self.path);
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let snapshot = serde_json::from_str(&content).map_err(|e| {
            StorageError::Serialization(format!("Failed to load snapshot {:?}: {}", self.path, e))
        })?;
        Ok(Some(snapshot))
    }

    async fn save<T>(&self, snapshot: &T) -> StorageResult<()>
    where
        T: Serialize + Send + Sync,
    {
        let content = serde_json::to_vec_pretty(snapshot).map_err(|e| {
            StorageError::Serialization(format!("Failed to serialize snapshot: {}", e))
        })?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &content))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;

        debug!("Wrote snapshot to {:?}", self.path);
        Ok(())
    }
}

/// Snapshot held in memory as serialized JSON, for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    content: Mutex<Option<String>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with an existing serialized snapshot
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(content.into())),
        }
    }

    pub async fn content(&self) -> Option<String> {
        self.content.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SnapshotAdapter for MemorySnapshot {
    async fn load<T>(&self) -> StorageResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let content = self.content.lock().await;
        content
            .as_deref()
            .map(|raw| {
                serde_json::from_str(raw)
                    .map_err(|e| StorageError::Serialization(format!("Failed to load snapshot: {}", e)))
            })
            .transpose()
    }

    async fn save<T>(&self, snapshot: &T) -> StorageResult<()>
    where
        T: Serialize + Send + Sync,
    {
        let raw = serde_json::to_string(snapshot).map_err(|e| {
            StorageError::Serialization(format!("Failed to serialize snapshot: {}", e))
        })?;
        *self.content.lock().await = Some(raw);
        Ok(())
    }
}
