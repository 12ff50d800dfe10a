//! Book reservations service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        enums::ReservationStatus,
        reservation::{
            NewReservation, Reservation, ReservationFilter, ReservationForm, StatusChange,
            StatusUpdate,
        },
    },
    repository::Repository,
    store::Subscription,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Place a reservation on an existing book
    pub async fn create(&self, form: ReservationForm) -> AppResult<Reservation> {
        let form = form.trimmed();
        form.validate()?;
        let book = self.repository.books.get(&form.book_id).await?;

        let data = NewReservation {
            book_id: book.id,
            book_title: book.title,
            reserver_name: form.reserver_name,
            reserver_email: form.reserver_email,
            reserved_at: Utc::now(),
            status: ReservationStatus::Pending,
        };
        let reservation = self.repository.reservations.create(&data).await?;
        tracing::info!(
            "Reservation {} placed for '{}'",
            reservation.id,
            reservation.book_title
        );
        Ok(reservation)
    }

    /// Reservations matching the filter, newest first
    pub async fn list(&self, filter: ReservationFilter) -> AppResult<Vec<Reservation>> {
        let reservations = self.repository.reservations.list().await?;
        Ok(newest_first(reservations, filter))
    }

    pub async fn update_status(&self, id: &str, update: StatusUpdate) -> AppResult<Reservation> {
        let change = StatusChange {
            status: update.status,
            updated_at: Utc::now(),
        };
        self.repository
            .reservations
            .update(id, &change, update.expected_version)
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.reservations.delete(id).await
    }

    pub async fn subscribe(&self) -> AppResult<Subscription> {
        self.repository.reservations.subscribe().await
    }
}

/// Filter and sort by reservation date, newest first
pub fn newest_first(reservations: Vec<Reservation>, filter: ReservationFilter) -> Vec<Reservation> {
    let mut kept: Vec<_> = reservations
        .into_iter()
        .filter(|r| filter.matches(r.status))
        .collect();
    kept.sort_by(|a, b| b.reserved_at.cmp(&a.reserved_at));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::book::BookInput, services::books::BooksService, store::MemoryStore};
    use std::sync::Arc;

    fn repository() -> Repository {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    async fn book(repository: &Repository) -> String {
        BooksService::new(repository.clone())
            .create(BookInput {
                title: "Cien años de soledad".to_string(),
                shelf: 1,
                row: 1,
                quantity: 2,
                expected_version: None,
            })
            .await
            .unwrap()
            .id
    }

    fn form(book_id: &str) -> ReservationForm {
        ReservationForm {
            book_id: book_id.to_string(),
            reserver_name: "Luz Gómez".to_string(),
            reserver_email: "luz@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_reservation_copies_title() {
        let repository = repository();
        let book_id = book(&repository).await;
        let reservations = ReservationsService::new(repository);

        let reservation = reservations.create(form(&book_id)).await.unwrap();
        assert_eq!(reservation.book_title, "Cien años de soledad");
        assert_eq!(reservation.status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn test_contact_details_are_trimmed_before_checks() {
        let repository = repository();
        let book_id = book(&repository).await;
        let reservations = ReservationsService::new(repository);

        let reservation = reservations
            .create(ReservationForm {
                book_id: format!(" {} ", book_id),
                reserver_name: "  Luz Gómez ".to_string(),
                reserver_email: " luz@example.com ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reservation.reserver_name, "Luz Gómez");
        assert_eq!(reservation.reserver_email, "luz@example.com");

        let blank_name = ReservationForm {
            reserver_name: "   ".to_string(),
            ..form(&book_id)
        };
        assert!(matches!(
            reservations.create(blank_name).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_book_rejected() {
        let reservations = ReservationsService::new(repository());
        assert!(matches!(
            reservations.create(form("missing")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_status_filter_and_order() {
        let repository = repository();
        let book_id = book(&repository).await;
        let reservations = ReservationsService::new(repository);

        let first = reservations.create(form(&book_id)).await.unwrap();
        let second = reservations.create(form(&book_id)).await.unwrap();
        reservations
            .update_status(
                &first.id,
                StatusUpdate { status: ReservationStatus::Completed, expected_version: Some(1) },
            )
            .await
            .unwrap();

        let all = reservations.list(ReservationFilter::All).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].reserved_at >= all[1].reserved_at);

        let pending = reservations.list(ReservationFilter::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);

        let completed = reservations.list(ReservationFilter::Completed).await.unwrap();
        assert_eq!(completed[0].id, first.id);
        assert!(completed[0].updated_at.is_some());
    }
}
