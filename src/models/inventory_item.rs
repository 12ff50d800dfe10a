//! Equipment inventory (maps, chess sets, netbooks, furniture...)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{enums::InventoryCategory, optional_text, required_text};
use crate::{error::AppResult, repository::Document};

/// Inventory item record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryItem {
    pub id: String,
    pub version: i64,
    pub name: String,
    pub category: InventoryCategory,
    pub quantity: i32,
    #[serde(default)]
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document for InventoryItem {
    const COLLECTION: &'static str = "inventory_items";
}

/// Create or update inventory item request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct InventoryItemInput {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    pub name: String,
    pub category: InventoryCategory,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Stored payload of a new item
#[derive(Debug, Serialize)]
pub struct NewInventoryItem {
    pub name: String,
    pub category: InventoryCategory,
    pub quantity: i32,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Stored patch of an edited item
#[derive(Debug, Serialize)]
pub struct InventoryItemChanges {
    pub name: String,
    pub category: InventoryCategory,
    pub quantity: i32,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItemInput {
    fn checked(&self) -> AppResult<(String, Option<String>)> {
        self.validate()?;
        Ok((required_text("name", &self.name)?, optional_text(self.notes.as_deref())))
    }

    pub fn into_new(self, now: DateTime<Utc>) -> AppResult<NewInventoryItem> {
        let (name, notes) = self.checked()?;
        Ok(NewInventoryItem {
            name,
            category: self.category,
            quantity: self.quantity,
            notes,
            recorded_at: now,
        })
    }

    pub fn into_changes(self, now: DateTime<Utc>) -> AppResult<InventoryItemChanges> {
        let (name, notes) = self.checked()?;
        Ok(InventoryItemChanges {
            name,
            category: self.category,
            quantity: self.quantity,
            notes,
            updated_at: now,
        })
    }
}

/// Items of one category
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryGroup {
    pub category: InventoryCategory,
    pub label: String,
    pub items: Vec<InventoryItem>,
}
