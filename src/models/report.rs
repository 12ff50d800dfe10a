//! Report payloads

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::enums::ReportPeriod;

/// Query parameters for period reports
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    /// daily (default), weekly or monthly
    #[serde(default)]
    pub period: ReportPeriod,
}

/// A labelled count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountEntry {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShelfCount {
    pub shelf: i32,
    pub copies: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShelfRowCount {
    pub shelf: i32,
    pub row: i32,
    pub copies: i64,
}

/// Copies held, in total and per location
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryReport {
    pub total_copies: i64,
    pub by_shelf: Vec<ShelfCount>,
    pub by_shelf_row: Vec<ShelfRowCount>,
}

/// Loan activity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanReport {
    pub period: ReportPeriod,
    pub total_loans: u64,
    /// Teacher loans per subject
    pub by_subject: Vec<CountEntry>,
    pub by_teacher: Vec<CountEntry>,
    pub by_student: Vec<CountEntry>,
    /// Newest period first
    pub by_period: Vec<CountEntry>,
}

/// Library usage activity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageReport {
    pub period: ReportPeriod,
    pub total_events: u64,
    pub by_subject: Vec<CountEntry>,
    pub by_teacher: Vec<CountEntry>,
    pub by_shift: Vec<CountEntry>,
    /// Newest period first
    pub by_period: Vec<CountEntry>,
    pub total_page_visits: u64,
}
