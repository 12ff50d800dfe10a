//! Book reservations placed from the public catalogue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::ReservationStatus;
use crate::repository::Document;

/// Reservation record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: String,
    pub version: i64,
    pub book_id: String,
    /// Title copied from the book when the reservation was placed
    pub book_title: String,
    pub reserver_name: String,
    pub reserver_email: String,
    pub reserved_at: DateTime<Utc>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document for Reservation {
    const COLLECTION: &'static str = "reservations";
}

/// Public reservation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReservationForm {
    #[validate(length(min = 1, message = "book_id is required"))]
    pub book_id: String,
    #[validate(length(min = 1, max = 120, message = "reserver_name must be between 1 and 120 characters"))]
    pub reserver_name: String,
    #[validate(email(message = "reserver_email must be a valid email address"))]
    pub reserver_email: String,
}

impl ReservationForm {
    /// Strip surrounding whitespace so validation sees what will be stored
    pub fn trimmed(self) -> Self {
        Self {
            book_id: self.book_id.trim().to_string(),
            reserver_name: self.reserver_name.trim().to_string(),
            reserver_email: self.reserver_email.trim().to_string(),
        }
    }
}

/// Stored payload of a new reservation
#[derive(Debug, Serialize)]
pub struct NewReservation {
    pub book_id: String,
    pub book_title: String,
    pub reserver_name: String,
    pub reserver_email: String,
    pub reserved_at: DateTime<Utc>,
    pub status: ReservationStatus,
}

/// Status change request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub status: ReservationStatus,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Stored patch of a status change
#[derive(Debug, Serialize)]
pub struct StatusChange {
    pub status: ReservationStatus,
    pub updated_at: DateTime<Utc>,
}

/// Status filter for reservation listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationFilter {
    #[default]
    All,
    Pending,
    Completed,
    Cancelled,
}

impl ReservationFilter {
    pub fn matches(&self, status: ReservationStatus) -> bool {
        match self {
            ReservationFilter::All => true,
            ReservationFilter::Pending => status == ReservationStatus::Pending,
            ReservationFilter::Completed => status == ReservationStatus::Completed,
            ReservationFilter::Cancelled => status == ReservationStatus::Cancelled,
        }
    }
}

/// Query parameters for reservation listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ReservationQuery {
    /// all (default), pending, completed or cancelled
    #[serde(default)]
    pub status: ReservationFilter,
}
