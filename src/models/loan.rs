//! Loan, return and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{
    enums::{BorrowerKind, LoanStatus, Shift},
    optional_text, required_text,
};
use crate::{
    error::{AppError, AppResult},
    repository::Document,
};

/// Who borrowed the book, with the details recorded for each kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Borrower {
    Teacher { subject: String },
    Student { course: String, shift: Shift },
}

impl Borrower {
    pub fn kind(&self) -> BorrowerKind {
        match self {
            Borrower::Teacher { .. } => BorrowerKind::Teacher,
            Borrower::Student { .. } => BorrowerKind::Student,
        }
    }
}

/// Loan record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    pub id: String,
    pub version: i64,
    pub first_name: String,
    pub last_name: String,
    pub borrower: Borrower,
    /// Inventory number of the lent copy
    pub inventory_number: String,
    pub book_title: String,
    pub loaned_at: DateTime<Utc>,
    pub status: LoanStatus,
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,
}

impl Document for Loan {
    const COLLECTION: &'static str = "loans";
}

impl Loan {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Return history entry: a copy of the loan at the time it was closed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanReturn {
    pub id: String,
    pub version: i64,
    pub loan_id: String,
    pub first_name: String,
    pub last_name: String,
    pub borrower: Borrower,
    pub inventory_number: String,
    pub book_title: String,
    pub loaned_at: DateTime<Utc>,
    pub returned_at: DateTime<Utc>,
    pub status: LoanStatus,
}

impl Document for LoanReturn {
    const COLLECTION: &'static str = "returns";
}

/// Loan desk form as submitted by the client.
///
/// Fields are loose so that missing values surface as validation errors
/// rather than decoding failures.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoanForm {
    pub first_name: String,
    pub last_name: String,
    pub borrower_type: Option<BorrowerKind>,
    /// Required for teachers
    pub subject: Option<String>,
    /// Required for students
    pub course: Option<String>,
    /// Required for students
    pub shift: Option<Shift>,
    pub inventory_number: String,
    pub book_title: String,
}

impl LoanForm {
    /// Check required fields and build the stored loan
    pub fn into_new_loan(self, now: DateTime<Utc>) -> AppResult<NewLoan> {
        let first_name = required_text("first_name", &self.first_name)?;
        let last_name = required_text("last_name", &self.last_name)?;
        let kind = self
            .borrower_type
            .ok_or_else(|| AppError::Validation("borrower_type is required".to_string()))?;
        let inventory_number = required_text("inventory_number", &self.inventory_number)?;
        let book_title = required_text("book_title", &self.book_title)?;

        let borrower = match kind {
            BorrowerKind::Teacher => Borrower::Teacher {
                subject: optional_text(self.subject.as_deref()).ok_or_else(|| {
                    AppError::Validation("subject is required for teachers".to_string())
                })?,
            },
            BorrowerKind::Student => {
                let course = optional_text(self.course.as_deref());
                match (course, self.shift) {
                    (Some(course), Some(shift)) => Borrower::Student { course, shift },
                    _ => {
                        return Err(AppError::Validation(
                            "course and shift are required for students".to_string(),
                        ))
                    }
                }
            }
        };

        Ok(NewLoan {
            first_name,
            last_name,
            borrower,
            inventory_number,
            book_title,
            loaned_at: now,
            status: LoanStatus::Loaned,
        })
    }
}

/// Stored payload of a new loan
#[derive(Debug, Serialize)]
pub struct NewLoan {
    pub first_name: String,
    pub last_name: String,
    pub borrower: Borrower,
    pub inventory_number: String,
    pub book_title: String,
    pub loaned_at: DateTime<Utc>,
    pub status: LoanStatus,
}

/// Stored payload of a return history entry
#[derive(Debug, Serialize)]
pub struct NewLoanReturn {
    pub loan_id: String,
    pub first_name: String,
    pub last_name: String,
    pub borrower: Borrower,
    pub inventory_number: String,
    pub book_title: String,
    pub loaned_at: DateTime<Utc>,
    pub returned_at: DateTime<Utc>,
    pub status: LoanStatus,
}

impl NewLoanReturn {
    pub fn from_loan(loan: &Loan, returned_at: DateTime<Utc>) -> Self {
        Self {
            loan_id: loan.id.clone(),
            first_name: loan.first_name.clone(),
            last_name: loan.last_name.clone(),
            borrower: loan.borrower.clone(),
            inventory_number: loan.inventory_number.clone(),
            book_title: loan.book_title.clone(),
            loaned_at: loan.loaned_at,
            returned_at,
            status: LoanStatus::Returned,
        }
    }
}

/// Patch switching a loan between loaned and returned
#[derive(Debug, Serialize)]
pub struct LoanClosure {
    pub status: LoanStatus,
    /// Serialized as `null` when reopening, clearing the stored value
    pub returned_at: Option<DateTime<Utc>>,
}

impl LoanClosure {
    pub fn returned(at: DateTime<Utc>) -> Self {
        Self {
            status: LoanStatus::Returned,
            returned_at: Some(at),
        }
    }

    pub fn reopened() -> Self {
        Self {
            status: LoanStatus::Loaned,
            returned_at: None,
        }
    }
}

/// Query parameters for loan listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    /// Only loans in this status
    pub status: Option<LoanStatus>,
}
