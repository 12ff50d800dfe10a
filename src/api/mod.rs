//! API handlers for Biblioteca REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod inventory;
pub mod loans;
pub mod openapi;
pub mod reports;
pub mod reservations;
pub mod search;
pub mod stream;
pub mod usage;
pub mod visits;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{delete, get, post, put},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult},
    models::session::Session,
    AppState,
};

/// Bearer token of the request, if an Authorization header was sent
async fn bearer_token(parts: &mut Parts, state: &AppState) -> AppResult<Option<String>> {
    match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
        Ok(TypedHeader(Authorization(bearer))) => Ok(Some(bearer.token().to_string())),
        Err(rejection) if rejection.is_missing() => Ok(None),
        Err(_) => Err(AppError::Authentication(
            "Invalid authorization header format".to_string(),
        )),
    }
}

/// Extractor for a valid session token
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state)
            .await?
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;
        let session = state.services.auth.load_session(&token)?;
        Ok(CurrentSession(session))
    }
}

/// Extractor for a session with administrator rights
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        session.require_admin()?;
        Ok(AdminSession(session))
    }
}

/// Session when a valid token is sent; anonymous otherwise
pub struct OptionalSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Ok(Some(token)) = bearer_token(parts, state).await else {
            return Ok(OptionalSession(None));
        };
        match state.services.auth.load_session(&token) {
            Ok(session) => Ok(OptionalSession(Some(session))),
            Err(e) => {
                tracing::debug!("Ignoring invalid session on public route: {}", e);
                Ok(OptionalSession(None))
            }
        }
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Books
        .route("/books", get(books::list_books))
        .route("/books", post(books::create_book))
        .route("/books/stream", get(books::stream_books))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id", put(books::update_book))
        .route("/books/:id", delete(books::delete_book))
        // Loans
        .route("/loans", get(loans::list_loans))
        .route("/loans", post(loans::create_loan))
        .route("/loans/stream", get(loans::stream_loans))
        .route("/loans/:id/return", post(loans::return_loan))
        .route("/returns", get(loans::list_returns))
        // Usage events
        .route("/usage-events", get(usage::list_usage_events))
        .route("/usage-events", post(usage::create_usage_event))
        .route("/usage-events/:id", get(usage::get_usage_event))
        .route("/usage-events/:id", put(usage::update_usage_event))
        .route("/usage-events/:id", delete(usage::delete_usage_event))
        // Inventory
        .route("/inventory", get(inventory::list_inventory))
        .route("/inventory", post(inventory::create_inventory_item))
        .route("/inventory/:id", get(inventory::get_inventory_item))
        .route("/inventory/:id", put(inventory::update_inventory_item))
        .route("/inventory/:id", delete(inventory::delete_inventory_item))
        // Reservations
        .route("/reservations", get(reservations::list_reservations))
        .route("/reservations", post(reservations::create_reservation))
        .route("/reservations/stream", get(reservations::stream_reservations))
        .route("/reservations/:id", delete(reservations::delete_reservation))
        .route("/reservations/:id/status", put(reservations::update_reservation_status))
        // Visits
        .route("/visits", post(visits::record_visit))
        .route("/visits/count", get(visits::count_visits))
        // Reports
        .route("/reports/inventory", get(reports::inventory_report))
        .route("/reports/loans", get(reports::loan_report))
        .route("/reports/usage", get(reports::usage_report))
        // Public-domain search
        .route("/search/books", get(search::search_books))
        .route("/search/categories", get(search::list_categories))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
