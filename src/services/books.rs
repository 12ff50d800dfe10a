//! Book inventory service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookChanges, BookInput, NewBook},
        required_text,
    },
    repository::Repository,
    store::Subscription,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books in registration order, optionally filtered by title
    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<Book>> {
        let books = self.repository.books.list().await?;
        Ok(filter_by_title(books, search))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get(id).await
    }

    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        input.validate()?;
        let data = NewBook {
            title: required_text("title", &input.title)?,
            shelf: input.shelf,
            row: input.row,
            quantity: input.quantity,
            registered_at: Utc::now(),
        };
        self.repository.books.create(&data).await
    }

    pub async fn update(&self, id: &str, input: BookInput) -> AppResult<Book> {
        input.validate()?;
        let changes = BookChanges {
            title: required_text("title", &input.title)?,
            shelf: input.shelf,
            row: input.row,
            quantity: input.quantity,
            updated_at: Utc::now(),
        };
        self.repository
            .books
            .update(id, &changes, input.expected_version)
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    pub async fn subscribe(&self) -> AppResult<Subscription> {
        self.repository.books.subscribe().await
    }
}

/// Keep books whose title contains `search`, ignoring case; a blank term keeps everything
pub fn filter_by_title(books: Vec<Book>, search: Option<&str>) -> Vec<Book> {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(term) => books.into_iter().filter(|b| b.title_contains(term)).collect(),
        None => books,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, store::MemoryStore};
    use std::sync::Arc;

    fn service() -> BooksService {
        BooksService::new(Repository::new(Arc::new(MemoryStore::new())))
    }

    fn input(title: &str) -> BookInput {
        BookInput {
            title: title.to_string(),
            shelf: 3,
            row: 2,
            quantity: 1,
            expected_version: None,
        }
    }

    #[tokio::test]
    async fn test_created_book_is_listed_once() {
        let books = service();
        let created = books.create(input("Rayuela")).await.unwrap();
        let listed = books.list(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let books = service();
        let created = books.create(input("Rayuela")).await.unwrap();
        let updated = books
            .update(&created.id, BookInput { quantity: 4, ..input("Rayuela (2nd ed.)") })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.version, 2);
        assert_eq!(updated.registered_at, created.registered_at);
        assert!(updated.updated_at.is_some());

        let listed = books.list(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_stale_update_conflicts() {
        let books = service();
        let created = books.create(input("Rayuela")).await.unwrap();
        books.update(&created.id, input("Rayuela")).await.unwrap();

        let stale = BookInput { expected_version: Some(1), ..input("Other") };
        assert!(matches!(books.update(&created.id, stale).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_deleted_book_disappears() {
        let books = service();
        let created = books.create(input("Rayuela")).await.unwrap();
        books.delete(&created.id).await.unwrap();
        assert!(books.list(None).await.unwrap().is_empty());
        assert!(matches!(books.get_by_id(&created.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_title_filter() {
        let books = service();
        books.create(input("El Principito")).await.unwrap();
        books.create(input("Don Quijote")).await.unwrap();
        books.create(input("Principios de física")).await.unwrap();

        let found = books.list(Some("PRINCIP")).await.unwrap();
        let titles: Vec<_> = found.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["El Principito", "Principios de física"]);

        assert_eq!(books.list(Some("   ")).await.unwrap().len(), 3);
        assert!(books.list(Some("Borges")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_shelf_rejected() {
        let books = service();
        let err = books.create(BookInput { shelf: 29, ..input("Rayuela") }).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.contains("shelf")));
        assert!(matches!(
            books.create(input("   ")).await,
            Err(AppError::Validation(_))
        ));
    }
}
