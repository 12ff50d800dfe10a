//! Reservation endpoints

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
    models::reservation::{
        Reservation, ReservationFilter, ReservationForm, ReservationQuery, StatusUpdate,
    },
    services::reservations::newest_first,
};

use super::{stream::snapshot_events, AdminSession};

/// Reserve a book (public)
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    request_body = ReservationForm,
    responses(
        (status = 201, description = "Reservation placed", body = Reservation),
        (status = 400, description = "Invalid name or email", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    Json(form): Json<ReservationForm>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = state.services.reservations.create(form).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// List reservations, newest first
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Reservations", body = Vec<Reservation>)
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Query(query): Query<ReservationQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state.services.reservations.list(query.status).await?;
    Ok(Json(reservations))
}

/// Live reservation list, newest first (Server-Sent Events)
#[utoipa::path(
    get,
    path = "/reservations/stream",
    tag = "reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "`snapshot` events carrying all reservations", body = String, content_type = "text/event-stream")
    )
)]
pub async fn stream_reservations(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let subscription = state.services.reservations.subscribe().await?;
    Ok(snapshot_events::<Reservation, _>(subscription, |reservations| {
        newest_first(reservations, ReservationFilter::All)
    }))
}

/// Change a reservation's status
#[utoipa::path(
    put,
    path = "/reservations/{id}/status",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status updated", body = Reservation),
        (status = 404, description = "Reservation not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Stale expected_version", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_reservation_status(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.update_status(&id, update).await?;
    Ok(Json(reservation))
}

/// Delete a reservation
#[utoipa::path(
    delete,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 204, description = "Reservation deleted")
    )
)]
pub async fn delete_reservation(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.reservations.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
