//! Library usage event endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::usage_event::{UsageEvent, UsageEventInput},
};

use super::AdminSession;

/// List usage events
#[utoipa::path(
    get,
    path = "/usage-events",
    tag = "usage",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Usage events", body = Vec<UsageEvent>)
    )
)]
pub async fn list_usage_events(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
) -> AppResult<Json<Vec<UsageEvent>>> {
    Ok(Json(state.services.usage.list().await?))
}

/// Get usage event by ID
#[utoipa::path(
    get,
    path = "/usage-events/{id}",
    tag = "usage",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Usage event ID")),
    responses(
        (status = 200, description = "Usage event", body = UsageEvent)
    )
)]
pub async fn get_usage_event(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
) -> AppResult<Json<UsageEvent>> {
    Ok(Json(state.services.usage.get_by_id(&id).await?))
}

/// Record a usage event
#[utoipa::path(
    post,
    path = "/usage-events",
    tag = "usage",
    security(("bearer_auth" = [])),
    request_body = UsageEventInput,
    responses(
        (status = 201, description = "Usage event created", body = UsageEvent),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_usage_event(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Json(input): Json<UsageEventInput>,
) -> AppResult<(StatusCode, Json<UsageEvent>)> {
    let event = state.services.usage.create(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Update a usage event
#[utoipa::path(
    put,
    path = "/usage-events/{id}",
    tag = "usage",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Usage event ID")),
    request_body = UsageEventInput,
    responses(
        (status = 200, description = "Usage event updated", body = UsageEvent),
        (status = 409, description = "Stale expected_version", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_usage_event(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
    Json(input): Json<UsageEventInput>,
) -> AppResult<Json<UsageEvent>> {
    Ok(Json(state.services.usage.update(&id, input).await?))
}

/// Delete a usage event
#[utoipa::path(
    delete,
    path = "/usage-events/{id}",
    tag = "usage",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Usage event ID")),
    responses(
        (status = 204, description = "Usage event deleted")
    )
)]
pub async fn delete_usage_event(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.usage.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
