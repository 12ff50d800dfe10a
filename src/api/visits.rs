//! Page-visit endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::page_visit::{VisitCount, VisitRequest, VisitResponse},
};

use super::{AdminSession, OptionalSession};

/// Record a page view. Logged-in visitors are identified by their session.
#[utoipa::path(
    post,
    path = "/visits",
    tag = "visits",
    request_body = VisitRequest,
    responses(
        (status = 201, description = "Visit recorded; keep the returned visitor_id", body = VisitResponse)
    )
)]
pub async fn record_visit(
    State(state): State<crate::AppState>,
    OptionalSession(session): OptionalSession,
    Json(request): Json<VisitRequest>,
) -> AppResult<(StatusCode, Json<VisitResponse>)> {
    let visit = state.services.visits.record(request, session.as_ref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(VisitResponse {
            visitor_id: visit.visitor_id,
        }),
    ))
}

/// Total recorded page views
#[utoipa::path(
    get,
    path = "/visits/count",
    tag = "visits",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Visit count", body = VisitCount)
    )
)]
pub async fn count_visits(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
) -> AppResult<Json<VisitCount>> {
    let total = state.services.visits.count().await?;
    Ok(Json(VisitCount { total }))
}
