//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::AppResult, models::session::AdminIdentity};

use super::CurrentSession;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// JWT to send as `Authorization: Bearer <token>`
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
    pub user: AdminIdentity,
}

/// Log in with a configured administrator account
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request.validate()?;
    let (user, token) = state.services.auth.login(&request.email, &request.password)?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.jwt_expiration_hours * 3600,
        user,
    }))
}

/// Log out. Sessions are stateless tokens, so the client simply discards its token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Logged out")
    )
)]
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Current session identity
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current identity", body = AdminIdentity),
        (status = 401, description = "Missing or invalid session", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(CurrentSession(session): CurrentSession) -> Json<AdminIdentity> {
    Json(session.identity())
}
