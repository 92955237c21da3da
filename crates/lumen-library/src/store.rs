//! Icon store abstraction.
//!
//! This module provides:
//! - `IconStore` trait, the persistence boundary of the library
//! - `StoreError` typed failures
//! - `InMemoryIconStore` for tests and offline use

use std::collections::HashMap;
use std::future::Future;

use lumen_common::IconId;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::record::IconRecord;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No record with this id.
    #[error("Icon not found: {0}")]
    NotFound(IconId),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence API for icon records.
///
/// Saves are full-replacement upserts keyed by id. Failures are returned to
/// the caller as-is; stores never retry.
pub trait IconStore: Send + Sync {
    /// Store name, for logs.
    fn name(&self) -> &str;

    /// Lists every record by id. An empty map is a valid result.
    fn list_all(&self) -> impl Future<Output = StoreResult<HashMap<IconId, IconRecord>>> + Send;

    /// Creates or replaces a record and returns the stored version.
    fn save(&self, record: &IconRecord) -> impl Future<Output = StoreResult<IconRecord>> + Send;

    /// Removes a record.
    fn delete(&self, id: &IconId) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Store keeping records in process memory.
#[derive(Debug, Default)]
pub struct InMemoryIconStore {
    records: RwLock<HashMap<IconId, IconRecord>>,
}

impl InMemoryIconStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `records`.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = IconRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl IconStore for InMemoryIconStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_all(&self) -> StoreResult<HashMap<IconId, IconRecord>> {
        Ok(self.records.read().clone())
    }

    async fn save(&self, record: &IconRecord) -> StoreResult<IconRecord> {
        debug!(id = %record.id, "Storing icon in memory");
        self.records.write().insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    async fn delete(&self, id: &IconId) -> StoreResult<()> {
        match self.records.write().remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lumen_editor::grid::PixelGrid;

    fn record(name: &str) -> IconRecord {
        IconRecord::new(IconId::generate(), name, vec![PixelGrid::new()], 8, Utc::now())
    }

    #[tokio::test]
    async fn test_save_then_list() {
        let store = InMemoryIconStore::new();
        let heart = record("Heart");
        let stored = store.save(&heart).await.expect("save");
        assert_eq!(stored, heart);

        let all = store.list_all().await.expect("list");
        assert_eq!(all.get(&heart.id), Some(&heart));
    }

    #[tokio::test]
    async fn test_save_replaces() {
        let store = InMemoryIconStore::new();
        let mut heart = record("Heart");
        store.save(&heart).await.expect("save");
        heart.name = "Big heart".to_string();
        store.save(&heart).await.expect("save again");

        assert_eq!(store.len(), 1);
        let all = store.list_all().await.expect("list");
        assert_eq!(all[&heart.id].name, "Big heart");
    }

    #[tokio::test]
    async fn test_delete_then_list() {
        let heart = record("Heart");
        let store = InMemoryIconStore::with_records([heart.clone(), record("Star")]);
        store.delete(&heart.id).await.expect("delete");

        let all = store.list_all().await.expect("list");
        assert!(!all.contains_key(&heart.id));
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let store = InMemoryIconStore::new();
        let id = IconId::from_raw("WI404");
        let err = store.delete(&id).await.expect_err("missing");
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_empty_list_is_ok() {
        let store = InMemoryIconStore::new();
        assert!(store.list_all().await.expect("list").is_empty());
        assert!(store.is_empty());
    }
}
