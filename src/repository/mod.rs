//! Repository layer: typed collections over the document store

use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        inventory_item::InventoryItem,
        loan::{Loan, LoanReturn},
        page_visit::PageVisit,
        reservation::Reservation,
        usage_event::UsageEvent,
    },
    store::{DocumentStore, StoredDocument, Subscription},
};

/// A schema type stored in a named collection.
///
/// Implementors deserialize from the stored payload with `id` and `version`
/// added alongside the document's own fields.
pub trait Document: DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
}

/// Typed access to one collection
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Decode a stored document into its schema type
    pub fn decode(document: &StoredDocument) -> AppResult<T> {
        let mut payload = document.data.clone();
        let Value::Object(map) = &mut payload else {
            return Err(AppError::Internal(format!(
                "Document {} in {} is not an object",
                document.id,
                T::COLLECTION
            )));
        };
        map.insert("id".to_string(), Value::String(document.id.clone()));
        map.insert("version".to_string(), Value::from(document.version));

        serde_json::from_value(payload).map_err(|e| {
            AppError::Internal(format!(
                "Document {} in {} does not match its schema: {}",
                document.id,
                T::COLLECTION,
                e
            ))
        })
    }

    /// Decode a whole snapshot, skipping documents that do not fit the schema
    pub fn decode_all(documents: &[StoredDocument]) -> Vec<T> {
        documents
            .iter()
            .filter_map(|doc| match Self::decode(doc) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Skipping malformed document: {}", e);
                    None
                }
            })
            .collect()
    }

    pub async fn list(&self) -> AppResult<Vec<T>> {
        let documents = self.store.list(T::COLLECTION).await?;
        Ok(Self::decode_all(&documents))
    }

    pub async fn get(&self, id: &str) -> AppResult<T> {
        let document = self
            .store
            .get(T::COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", T::COLLECTION, id)))?;
        Self::decode(&document)
    }

    pub async fn create<D: Serialize + Sync>(&self, data: &D) -> AppResult<T> {
        let payload = serde_json::to_value(data)?;
        let document = self.store.create(T::COLLECTION, payload).await?;
        tracing::info!("Created {} {}", T::COLLECTION, document.id);
        Self::decode(&document)
    }

    pub async fn update<D: Serialize + Sync>(
        &self,
        id: &str,
        patch: &D,
        expected_version: Option<i64>,
    ) -> AppResult<T> {
        let payload = serde_json::to_value(patch)?;
        let document = self
            .store
            .update(T::COLLECTION, id, payload, expected_version)
            .await?;
        tracing::info!("Updated {} {} (version {})", T::COLLECTION, id, document.version);
        Self::decode(&document)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(T::COLLECTION, id).await?;
        tracing::info!("Deleted {} {}", T::COLLECTION, id);
        Ok(())
    }

    pub async fn count(&self) -> AppResult<u64> {
        self.store.count(T::COLLECTION).await
    }

    /// Raw snapshot subscription; decode with [`Collection::decode_all`]
    pub async fn subscribe(&self) -> AppResult<Subscription> {
        self.store.subscribe(T::COLLECTION).await
    }
}

/// Main repository struct holding one typed collection per entity
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn DocumentStore>,
    pub books: Collection<Book>,
    pub loans: Collection<Loan>,
    pub returns: Collection<LoanReturn>,
    pub usage_events: Collection<UsageEvent>,
    pub inventory: Collection<InventoryItem>,
    pub reservations: Collection<Reservation>,
    pub page_visits: Collection<PageVisit>,
}

impl Repository {
    /// Create a new repository on the given store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            books: Collection::new(store.clone()),
            loans: Collection::new(store.clone()),
            returns: Collection::new(store.clone()),
            usage_events: Collection::new(store.clone()),
            inventory: Collection::new(store.clone()),
            reservations: Collection::new(store.clone()),
            page_visits: Collection::new(store.clone()),
            store,
        }
    }
}
