//! Error types for Biblioteca server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    AccessDenied = 3,
    StoreFailure = 4,
    NoSuchDocument = 5,
    BadValue = 6,
    StaleVersion = 7,
    UpstreamFailure = 8,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotAuthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::AccessDenied => StatusCode::FORBIDDEN,
            ErrorCode::NoSuchDocument => StatusCode::NOT_FOUND,
            ErrorCode::BadValue => StatusCode::BAD_REQUEST,
            ErrorCode::StaleVersion => StatusCode::CONFLICT,
            ErrorCode::UpstreamFailure => StatusCode::BAD_GATEWAY,
            ErrorCode::Failure | ErrorCode::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Access denied: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid value: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Version conflict: {0}")]
    Conflict(String),

    #[error("Malformed document: {0}")]
    BadRequest(String),

    #[error("Book search failed: {0}")]
    Upstream(String),

    #[error("Internal failure: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Authentication(_) => ErrorCode::NotAuthorized,
            AppError::Authorization(_) => ErrorCode::AccessDenied,
            AppError::NotFound(_) => ErrorCode::NoSuchDocument,
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorCode::BadValue,
            AppError::Database(_) => ErrorCode::StoreFailure,
            AppError::Conflict(_) => ErrorCode::StaleVersion,
            AppError::Upstream(_) => ErrorCode::UpstreamFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }

    /// Message safe to hand to clients; store and internal details stay in the logs
    fn public_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!(error = ?e, "document store failure");
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(%msg, "internal failure");
                "Internal server error".to_string()
            }
            AppError::Upstream(msg) => {
                tracing::warn!(%msg, "book search upstream failure");
                msg.clone()
            }
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect::<Vec<_>>()
                    .join(", ");
                if detail.is_empty() {
                    format!("{} is invalid", field)
                } else {
                    detail
                }
            })
            .collect();
        fields.sort();
        AppError::Validation(fields.join("; "))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("Serialization failure: {}", e))
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    /// Symbolic name of `code`, e.g. `StaleVersion`
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let body = ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message: self.public_message(),
        };
        (code.status(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_map_to_statuses() {
        assert_eq!(AppError::Conflict("v".into()).code().status(), StatusCode::CONFLICT);
        assert_eq!(AppError::BadRequest("x".into()).code(), ErrorCode::BadValue);
        assert_eq!(AppError::Upstream("down".into()).code().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ErrorCode::StoreFailure.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = AppError::Internal("secret path".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::NotFound("Book 1".into()).public_message(), "Book 1");
    }
}
