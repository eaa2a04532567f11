use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::errors::{AuthError, UnauthorizedReason};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid identity token: {0}")]
    InvalidIdentityToken(String),

    /// No session credential was presented.
    #[error("Unauthorized")]
    Unauthorized,

    /// A session credential was presented but is invalid or expired.
    #[error("Forbidden: {0}")]
    Forbidden(UnauthorizedReason),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidIdentityToken(reason) => AppError::InvalidIdentityToken(reason),
            AuthError::Configuration(reason) => AppError::Configuration(reason),
            AuthError::Unauthorized(reason) if reason.is_missing() => AppError::Unauthorized,
            AuthError::Unauthorized(reason) => AppError::Forbidden(reason),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidIdentityToken(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_IDENTITY_TOKEN",
                "Invalid token.".to_string(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "No token provided.".to_string(),
            ),
            AppError::Forbidden(_) => (
                StatusCode::FORBIDDEN,
                "INVALID_SESSION",
                "Invalid session token.".to_string(),
            ),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "The server is misconfigured".to_string(),
                )
            }
        };

        let body = Json(json!({
            "message": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
