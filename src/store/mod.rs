//! Document store abstraction
//!
//! Collections of schema-less JSON documents with live snapshot
//! subscriptions. Two backends are provided: an in-process store and a
//! PostgreSQL store keeping every collection in a single jsonb table.

pub mod memory;
pub mod postgres;

use std::{collections::HashMap, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use crate::error::{AppError, AppResult};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A document as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub version: i64,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full, insertion-ordered content of one collection
pub type Snapshot = Arc<Vec<StoredDocument>>;

/// Live view on a collection. Dropping it unsubscribes.
pub type Subscription = watch::Receiver<Snapshot>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection, in insertion order
    async fn list(&self, collection: &str) -> AppResult<Vec<StoredDocument>>;

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<StoredDocument>>;

    /// Insert a new document; the store generates its id
    async fn create(&self, collection: &str, data: Value) -> AppResult<StoredDocument>;

    /// Merge the top-level keys of `patch` into an existing document.
    ///
    /// When `expected_version` is set, the write is rejected with
    /// [`AppError::Conflict`] unless it matches the stored version.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
        expected_version: Option<i64>,
    ) -> AppResult<StoredDocument>;

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    async fn count(&self, collection: &str) -> AppResult<u64>;

    /// Subscribe to a collection. The receiver starts with the current
    /// snapshot and is notified after every change.
    async fn subscribe(&self, collection: &str) -> AppResult<Subscription>;

    /// Readiness probe
    async fn ping(&self) -> AppResult<()>;
}

/// Generate an opaque document id
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Shallow merge of `patch` into `target`, both JSON objects
pub fn merge_patch(target: &mut Value, patch: Value) -> AppResult<()> {
    let Value::Object(patch) = patch else {
        return Err(AppError::BadRequest("Update payload must be an object".to_string()));
    };
    match target {
        Value::Object(map) => {
            for (key, value) in patch {
                map.insert(key, value);
            }
            Ok(())
        }
        _ => Err(AppError::Internal("Stored document is not an object".to_string())),
    }
}

pub(crate) fn not_found(collection: &str, id: &str) -> AppError {
    AppError::NotFound(format!("Document {} not found in {}", id, collection))
}

pub(crate) fn stale_version(collection: &str, id: &str, expected: i64, actual: i64) -> AppError {
    AppError::Conflict(format!(
        "Document {} in {} was modified concurrently (expected version {}, found {})",
        id, collection, expected, actual
    ))
}

/// Per-collection snapshot channels shared by the store backends
#[derive(Default)]
pub struct SnapshotHub {
    channels: Mutex<HashMap<String, watch::Sender<Snapshot>>>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot of a collection, waking its subscribers.
    /// Collections nobody ever subscribed to are skipped.
    pub fn publish(&self, collection: &str, documents: Vec<StoredDocument>) {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(sender) = channels.get(collection) {
            sender.send_replace(Arc::new(documents));
        }
    }

    /// Whether a channel exists for the collection
    pub fn is_tracked(&self, collection: &str) -> bool {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.contains_key(collection)
    }

    /// Names of every collection with a channel
    pub fn tracked(&self) -> Vec<String> {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.keys().cloned().collect()
    }

    /// Subscribe to a collection, seeding the channel with `current` the
    /// first time the collection is watched.
    pub fn subscribe(&self, collection: &str, current: Vec<StoredDocument>) -> Subscription {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels
            .entry(collection.to_string())
            .or_insert_with(|| watch::channel(Arc::new(current)).0)
            .subscribe()
    }
}
