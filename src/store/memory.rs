//! In-process document store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    merge_patch, new_document_id, not_found, stale_version, DocumentStore, SnapshotHub,
    StoredDocument, Subscription,
};
use crate::error::{AppError, AppResult};

/// Document store kept entirely in memory. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
    hub: SnapshotHub,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<StoredDocument>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn create(&self, collection: &str, data: Value) -> AppResult<StoredDocument> {
        if !data.is_object() {
            return Err(AppError::BadRequest("Document must be an object".to_string()));
        }

        let now = Utc::now();
        let document = StoredDocument {
            id: new_document_id(),
            version: 1,
            data,
            created_at: now,
            updated_at: now,
        };

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        docs.push(document.clone());
        self.hub.publish(collection, docs.clone());

        tracing::debug!("Created document {} in {}", document.id, collection);
        Ok(document)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
        expected_version: Option<i64>,
    ) -> AppResult<StoredDocument> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let document = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found(collection, id))?;

        if let Some(expected) = expected_version {
            if expected != document.version {
                return Err(stale_version(collection, id, expected, document.version));
            }
        }

        merge_patch(&mut document.data, patch)?;
        document.version += 1;
        document.updated_at = Utc::now();
        let updated = document.clone();

        self.hub.publish(collection, docs.clone());
        Ok(updated)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let position = docs
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| not_found(collection, id))?;
        docs.remove(position);

        self.hub.publish(collection, docs.clone());
        Ok(())
    }

    async fn count(&self, collection: &str) -> AppResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn subscribe(&self, collection: &str) -> AppResult<Subscription> {
        // Hold the read lock so no write slips between the copy and the subscription
        let collections = self.collections.read().await;
        let current = collections.get(collection).cloned().unwrap_or_default();
        Ok(self.hub.subscribe(collection, current))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
