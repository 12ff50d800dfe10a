//! Book inventory endpoints

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, Sse},
    Json,
};
use tokio_stream::Stream;

use crate::{
    error::AppResult,
    models::book::{Book, BookInput, BookQuery},
};

use super::{stream::snapshot_events, AdminSession};

/// List books, optionally filtered by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Books in registration order", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list(query.search.as_deref()).await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(&id).await?;
    Ok(Json(book))
}

/// Live book list (Server-Sent Events)
#[utoipa::path(
    get,
    path = "/books/stream",
    tag = "books",
    responses(
        (status = 200, description = "`snapshot` events carrying the full book list", body = String, content_type = "text/event-stream")
    )
)]
pub async fn stream_books(
    State(state): State<crate::AppState>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let subscription = state.services.books.subscribe().await?;
    Ok(snapshot_events::<Book, _>(subscription, |books| books))
}

/// Register a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Json(input): Json<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Stale expected_version", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
    Json(input): Json<BookInput>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.update(&id, input).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.books.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
