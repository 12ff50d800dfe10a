//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::repository::Document;

/// Book in the library inventory
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: String,
    pub version: i64,
    /// Title, usually including author and publisher
    pub title: String,
    /// Shelf number (1-28)
    pub shelf: i32,
    /// Row on the shelf (1-6)
    pub row: i32,
    /// Number of copies
    pub quantity: i32,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document for Book {
    const COLLECTION: &'static str = "books";
}

impl Book {
    /// Case-insensitive title containment
    pub fn title_contains(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(&term.to_lowercase())
    }
}

/// Create or update book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(range(min = 1, max = 28, message = "shelf must be between 1 and 28"))]
    pub shelf: i32,
    #[validate(range(min = 1, max = 6, message = "row must be between 1 and 6"))]
    pub row: i32,
    #[validate(range(min = 0, message = "quantity cannot be negative"))]
    pub quantity: i32,
    /// Reject the update if the stored version differs
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Stored payload of a new book
#[derive(Debug, Serialize)]
pub struct NewBook {
    pub title: String,
    pub shelf: i32,
    pub row: i32,
    pub quantity: i32,
    pub registered_at: DateTime<Utc>,
}

/// Stored patch of an edited book
#[derive(Debug, Serialize)]
pub struct BookChanges {
    pub title: String,
    pub shelf: i32,
    pub row: i32,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for book listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive title fragment
    pub search: Option<String>,
}
