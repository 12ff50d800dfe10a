//! PostgreSQL document store
//!
//! All collections share the `documents` table. Writes announce the touched
//! collection on the `document_changes` channel; a listener task reloads that
//! collection and republishes its snapshot to local subscribers.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{postgres::PgListener, FromRow, Pool, Postgres, Transaction};

use super::{
    new_document_id, not_found, stale_version, DocumentStore, SnapshotHub, StoredDocument,
    Subscription,
};
use crate::error::{AppError, AppResult};

const CHANGES_CHANNEL: &str = "document_changes";
const LISTENER_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    version: i64,
    data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for StoredDocument {
    fn from(row: DocumentRow) -> Self {
        StoredDocument {
            id: row.id,
            version: row.version,
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
    hub: Arc<SnapshotHub>,
}

impl PgStore {
    /// Create a store on an existing pool. Call [`PgStore::listen`] to
    /// receive changes made by other processes.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            hub: Arc::new(SnapshotHub::new()),
        }
    }

    /// Spawn the change listener task.
    ///
    /// The listener reconnects by itself when its connection drops.
    /// Notifications sent meanwhile are lost, so every tracked collection is
    /// reloaded once the connection is back.
    pub async fn listen(&self) -> AppResult<()> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CHANGES_CHANNEL).await?;

        let store = self.clone();
        tokio::spawn(async move {
            loop {
                match listener.try_recv().await {
                    Ok(Some(notification)) => {
                        let collection = notification.payload();
                        if store.hub.is_tracked(collection) {
                            store.refresh(collection).await;
                        }
                    }
                    Ok(None) => {
                        tracing::warn!("Document change listener lost its connection, reloading");
                        store.refresh_all().await;
                    }
                    Err(e) => {
                        tracing::error!("Document change listener failed: {}", e);
                        tokio::time::sleep(LISTENER_RETRY_DELAY).await;
                    }
                }
            }
        });

        tracing::info!("Listening for document changes on {}", CHANGES_CHANNEL);
        Ok(())
    }

    /// Reload a collection and republish its snapshot
    async fn refresh(&self, collection: &str) {
        match self.fetch_all(collection).await {
            Ok(documents) => self.hub.publish(collection, documents),
            Err(e) => tracing::warn!(
                "Failed to reload collection {} after change: {}",
                collection,
                e
            ),
        }
    }

    async fn refresh_all(&self) {
        for collection in self.hub.tracked() {
            self.refresh(&collection).await;
        }
    }

    async fn fetch_all(&self, collection: &str) -> AppResult<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, version, data, created_at, updated_at
            FROM documents
            WHERE collection = $1
            ORDER BY seq
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StoredDocument::from).collect())
    }

    /// Queue a change notification; Postgres delivers it when `tx` commits
    async fn notify(tx: &mut Transaction<'_, Postgres>, collection: &str) -> AppResult<()> {
        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(CHANGES_CHANNEL)
            .bind(collection)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<StoredDocument>> {
        self.fetch_all(collection).await
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, version, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(StoredDocument::from))
    }

    async fn create(&self, collection: &str, data: Value) -> AppResult<StoredDocument> {
        if !data.is_object() {
            return Err(AppError::BadRequest("Document must be an object".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            RETURNING id, version, data, created_at, updated_at
            "#,
        )
        .bind(collection)
        .bind(new_document_id())
        .bind(&data)
        .fetch_one(&mut *tx)
        .await?;

        Self::notify(&mut tx, collection).await?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
        expected_version: Option<i64>,
    ) -> AppResult<StoredDocument> {
        if !patch.is_object() {
            return Err(AppError::BadRequest("Update payload must be an object".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET data = data || $3, version = version + 1, updated_at = NOW()
            WHERE collection = $1 AND id = $2
              AND ($4::BIGINT IS NULL OR version = $4)
            RETURNING id, version, data, created_at, updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(&patch)
        .bind(expected_version)
        .fetch_optional(&mut *tx)
        .await?;

        match row {
            Some(row) => {
                Self::notify(&mut tx, collection).await?;
                tx.commit().await?;
                Ok(row.into())
            }
            None => {
                tx.rollback().await?;
                // Either the document is gone or its version moved on
                let current = self.get(collection, id).await?;
                match (current, expected_version) {
                    (Some(doc), Some(expected)) => {
                        Err(stale_version(collection, id, expected, doc.version))
                    }
                    _ => Err(not_found(collection, id)),
                }
            }
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(not_found(collection, id));
        }
        Self::notify(&mut tx, collection).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn count(&self, collection: &str) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn subscribe(&self, collection: &str) -> AppResult<Subscription> {
        let current = self.fetch_all(collection).await?;
        let rx = self.hub.subscribe(collection, current);
        // A change may have landed between the fetch and the subscription
        let latest = self.fetch_all(collection).await?;
        self.hub.publish(collection, latest);
        Ok(rx)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
