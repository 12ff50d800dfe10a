//! Equipment inventory service

use chrono::Utc;
use indexmap::IndexMap;

use crate::{
    error::AppResult,
    models::inventory_item::{InventoryGroup, InventoryItem, InventoryItemInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
}

impl InventoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<InventoryItem>> {
        self.repository.inventory.list().await
    }

    /// Items grouped by category
    pub async fn list_grouped(&self) -> AppResult<Vec<InventoryGroup>> {
        Ok(group_by_category(self.list().await?))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<InventoryItem> {
        self.repository.inventory.get(id).await
    }

    pub async fn create(&self, input: InventoryItemInput) -> AppResult<InventoryItem> {
        let data = input.into_new(Utc::now())?;
        self.repository.inventory.create(&data).await
    }

    pub async fn update(&self, id: &str, input: InventoryItemInput) -> AppResult<InventoryItem> {
        let expected_version = input.expected_version;
        let changes = input.into_changes(Utc::now())?;
        self.repository
            .inventory
            .update(id, &changes, expected_version)
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.inventory.delete(id).await
    }
}

/// Group items by category, categories in first-seen order
pub fn group_by_category(items: Vec<InventoryItem>) -> Vec<InventoryGroup> {
    let mut groups: IndexMap<_, Vec<InventoryItem>> = IndexMap::new();
    for item in items {
        groups.entry(item.category).or_default().push(item);
    }
    groups
        .into_iter()
        .map(|(category, items)| InventoryGroup {
            category,
            label: category.label().to_string(),
            items,
        })
        .collect()
}
