//! Loan and return endpoints

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
    models::loan::{Loan, LoanForm, LoanQuery, LoanReturn},
};

use super::{stream::snapshot_events, AdminSession};

/// List loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanQuery),
    responses(
        (status = 200, description = "Loans", body = Vec<Loan>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.list(query.status).await?;
    Ok(Json(loans))
}

/// Record a loan
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = LoanForm,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Json(form): Json<LoanForm>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state.services.loans.create(form).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Live loan list (Server-Sent Events)
#[utoipa::path(
    get,
    path = "/loans/stream",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "`snapshot` events carrying the full loan list", body = String, content_type = "text/event-stream")
    )
)]
pub async fn stream_loans(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let subscription = state.services.loans.subscribe().await?;
    Ok(snapshot_events::<Loan, _>(subscription, |loans| loans))
}

/// Return a loaned book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan returned", body = LoanReturn),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Loan already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
) -> AppResult<Json<LoanReturn>> {
    let entry = state.services.loans.return_loan(&id).await?;
    Ok(Json(entry))
}

/// Return history
#[utoipa::path(
    get,
    path = "/returns",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Returns", body = Vec<LoanReturn>)
    )
)]
pub async fn list_returns(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
) -> AppResult<Json<Vec<LoanReturn>>> {
    let returns = state.services.loans.list_returns().await?;
    Ok(Json(returns))
}
