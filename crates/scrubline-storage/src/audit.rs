//! Audit trail of sanitization calls

use crate::traits::{SnapshotAdapter, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use scrubline_sanitizer::{SanitizationResult, SecretKind, SeverityStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tracing::{debug, error, info};
use uuid::Uuid;

/// One sanitization call. Only the redacted output is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub sanitized_text: String,
    pub kinds: Vec<SecretKind>,
    pub stats: SeverityStats,
    pub was_modified: bool,
}

impl AuditRecord {
    pub fn from_result(result: &SanitizationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            sanitized_text: result.sanitized_text.clone(),
            kinds: result.matches.kinds(),
            stats: result.stats(),
            was_modified: result.was_modified,
        }
    }
}

/// In-memory audit records backed by a snapshot adapter.
///
/// Nothing touches the adapter except [`AuditStore::open`] and
/// [`AuditStore::flush`].
pub struct AuditStore<A: SnapshotAdapter> {
    adapter: A,
    records: RwLock<HashMap<Uuid, AuditRecord>>,
    dirty: AtomicBool,
    max_records: Option<usize>,
}

impl<A: SnapshotAdapter> AuditStore<A> {
    /// Load the existing snapshot, if any
    pub async fn open(adapter: A) -> StorageResult<Self> {
        let loaded: Vec<AuditRecord> = adapter.load().await?.unwrap_or_default();
        debug!("Loaded {} audit records", loaded.len());

        let records = loaded.into_iter().map(|r| (r.id, r)).collect();
        Ok(Self {
            adapter,
            records: RwLock::new(records),
            dirty: AtomicBool::new(false),
            max_records: None,
        })
    }

    /// Keep at most `max_records`, evicting the oldest first. Applies to
    /// records already loaded from the snapshot.
    pub fn with_capacity(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        let evicted = evict_oldest(self.records.get_mut(), max_records);
        if evicted > 0 {
            debug!("Evicted {} loaded audit records over capacity", evicted);
            self.dirty.store(true, Ordering::Release);
        }
        self
    }

    pub async fn record(&self, record: AuditRecord) -> Uuid {
        let id = record.id;
        let mut records = self.records.write().await;
        records.insert(id, record);

        if let Some(max) = self.max_records {
            evict_oldest(&mut records, max);
        }

        // Set while the write guard is held so a concurrent flush sees it
        self.dirty.store(true, Ordering::Release);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<AuditRecord> {
        self.records.read().await.get(&id).cloned()
    }

    /// All records, oldest first
    pub async fn list(&self) -> Vec<AuditRecord> {
        sorted(&*self.records.read().await)
    }

    pub async fn remove(&self, id: Uuid) -> StorageResult<AuditRecord> {
        let removed = self
            .records
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound(format!("Audit record {} not found", id)))?;
        self.dirty.store(true, Ordering::Release);
        Ok(removed)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// True when there are changes not yet flushed
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Write every record through the adapter
    pub async fn flush(&self) -> StorageResult<()> {
        let snapshot = {
            let records = self.records.read().await;
            // Writers need the write lock, so nothing can land between
            // clearing the flag and taking the snapshot
            self.dirty.store(false, Ordering::Release);
            sorted(&records)
        };

        if let Err(e) = self.adapter.save(&snapshot).await {
            self.dirty.store(true, Ordering::Release);
            return Err(e);
        }

        debug!("Flushed {} audit records", snapshot.len());
        Ok(())
    }

    /// Flush on a fixed interval while there are pending changes
    pub fn start_auto_flush(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()>
    where
        A: 'static,
    {
        info!("Audit auto-flush every {:?}", every);
        tokio::spawn(async move {
            let mut ticker = interval(every);
            loop {
                ticker.tick().await;
                if !self.is_dirty() {
                    continue;
                }
                if let Err(e) = self.flush().await {
                    error!("Failed to flush audit records: {}", e);
                }
            }
        })
    }
}

fn sorted(records: &HashMap<Uuid, AuditRecord>) -> Vec<AuditRecord> {
    let mut list: Vec<AuditRecord> = records.values().cloned().collect();
    list.sort_by_key(|r| (r.recorded_at, r.id));
    list
}

/// Drop the oldest records until at most `max` remain; returns how many went
fn evict_oldest(records: &mut HashMap<Uuid, AuditRecord>, max: usize) -> usize {
    let mut evicted = 0;
    while records.len() > max {
        let oldest = records
            .values()
            .min_by_key(|r| (r.recorded_at, r.id))
            .map(|r| r.id);
        match oldest {
            Some(oldest) => {
                records.remove(&oldest);
                evicted += 1;
            }
            None => break,
        }
    }
    evicted
}
