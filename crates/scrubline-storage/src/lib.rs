//! Scrubline storage
//!
//! This crate provides the audit trail kept alongside the sanitization engine:
//! - Snapshot adapters (JSON file with atomic replace, in-memory)
//! - Audit store (in-memory map with explicit load and flush)

pub mod audit;
pub mod snapshot;
pub mod traits;

pub use audit::{AuditRecord, AuditStore};
pub use snapshot::{JsonFileSnapshot, MemorySnapshot};
pub use traits::{SnapshotAdapter, StorageError, StorageResult};
