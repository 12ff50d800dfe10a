//! Data models for Biblioteca

pub mod book;
pub mod enums;
pub mod inventory_item;
pub mod loan;
pub mod page_visit;
pub mod remote_book;
pub mod report;
pub mod reservation;
pub mod session;
pub mod usage_event;

// Re-export commonly used types
pub use book::Book;
pub use enums::{BorrowerKind, InventoryCategory, LoanStatus, ReportPeriod, ReservationStatus, Shift};
pub use inventory_item::InventoryItem;
pub use loan::{Borrower, Loan, LoanReturn};
pub use page_visit::PageVisit;
pub use reservation::Reservation;
pub use session::{AdminIdentity, Session};
pub use usage_event::UsageEvent;

use crate::error::{AppError, AppResult};

/// Trimmed copy of a required text field, or a validation error naming it
pub(crate) fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trimmed optional text, with blank values collapsed to `None`
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
