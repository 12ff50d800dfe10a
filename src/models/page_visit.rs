//! Page-visit tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repository::Document;

/// One recorded page view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageVisit {
    pub id: String,
    pub version: i64,
    pub path: String,
    pub visited_at: DateTime<Utc>,
    pub visitor_id: String,
    #[serde(default)]
    pub visitor_email: Option<String>,
    pub is_admin: bool,
}

impl Document for PageVisit {
    const COLLECTION: &'static str = "page_visits";
}

/// Stored payload of a page view
#[derive(Debug, Serialize)]
pub struct NewPageVisit {
    pub path: String,
    pub visited_at: DateTime<Utc>,
    pub visitor_id: String,
    pub visitor_email: Option<String>,
    pub is_admin: bool,
}

/// Visit report from the client
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VisitRequest {
    pub path: String,
    /// Anonymous id the client kept from a previous visit
    #[serde(default)]
    pub visitor_id: Option<String>,
}

/// Visitor id to keep for the next visit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitResponse {
    pub visitor_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitCount {
    pub total: u64,
}
