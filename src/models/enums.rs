//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Shift
// ---------------------------------------------------------------------------

/// School shift a student attends or an event took place in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Afternoon => "afternoon",
            Shift::Evening => "evening",
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Borrower kind
// ---------------------------------------------------------------------------

/// Kind of person borrowing a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BorrowerKind {
    Teacher,
    Student,
}

// ---------------------------------------------------------------------------
// Loan status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Loaned,
    Returned,
}

// ---------------------------------------------------------------------------
// Reservation status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Inventory category
// ---------------------------------------------------------------------------

/// Category of non-book equipment held by the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InventoryCategory {
    Maps,
    ChessSets,
    GeometryTools,
    Netbooks,
    TablesAndChairs,
    Desks,
    General,
}

impl InventoryCategory {
    pub const ALL: [InventoryCategory; 7] = [
        InventoryCategory::Maps,
        InventoryCategory::ChessSets,
        InventoryCategory::GeometryTools,
        InventoryCategory::Netbooks,
        InventoryCategory::TablesAndChairs,
        InventoryCategory::Desks,
        InventoryCategory::General,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InventoryCategory::Maps => "Maps",
            InventoryCategory::ChessSets => "Chess sets",
            InventoryCategory::GeometryTools => "Geometry tools",
            InventoryCategory::Netbooks => "Netbooks",
            InventoryCategory::TablesAndChairs => "Tables and chairs",
            InventoryCategory::Desks => "Desks",
            InventoryCategory::General => "General",
        }
    }
}

// ---------------------------------------------------------------------------
// Report period
// ---------------------------------------------------------------------------

/// Granularity of period buckets in reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_use_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&Shift::Afternoon).unwrap(), "\"afternoon\"");
        assert_eq!(
            serde_json::to_string(&InventoryCategory::TablesAndChairs).unwrap(),
            "\"tables_and_chairs\""
        );
        assert_eq!(
            serde_json::from_str::<ReservationStatus>("\"cancelled\"").unwrap(),
            ReservationStatus::Cancelled
        );
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert!(serde_json::from_str::<BorrowerKind>("\"janitor\"").is_err());
    }
}
