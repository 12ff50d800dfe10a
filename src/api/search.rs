//! Public-domain book search endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::remote_book::{categories, BookSearchQuery, SearchCategory, SearchResults},
};

/// Search Project Gutenberg through Gutendex
#[utoipa::path(
    get,
    path = "/search/books",
    tag = "search",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Search results", body = SearchResults),
        (status = 502, description = "Search service unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<SearchResults>> {
    let results = state.services.gutenberg.search(&query).await?;
    Ok(Json(results))
}

/// Bookshelf categories usable as `category`
#[utoipa::path(
    get,
    path = "/search/categories",
    tag = "search",
    responses(
        (status = 200, description = "Categories", body = Vec<SearchCategory>)
    )
)]
pub async fn list_categories() -> Json<Vec<SearchCategory>> {
    Json(categories())
}
