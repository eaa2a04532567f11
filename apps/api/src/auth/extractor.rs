use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;

use crate::auth::errors::{AuthError, UnauthorizedReason};
use crate::auth::session::ValidatedSession;
use crate::errors::AppError;
use crate::state::AppState;

/// Extractor for endpoints that require a session credential.
///
/// Reads `Authorization: Bearer <credential>` and validates it against the
/// current time. An absent header or empty credential rejects with 401; any
/// other failure rejects with 403.
pub struct AuthenticatedUser(pub ValidatedSession);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credential = bearer_credential(parts)?;

        let session = state
            .validator
            .validate(credential, Utc::now())
            .map_err(|e| {
                tracing::warn!("Session validation failed: {e}");
                AppError::from(e)
            })?;

        Ok(AuthenticatedUser(session))
    }
}

fn bearer_credential(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::Unauthorized(UnauthorizedReason::MissingCredential))?
        .to_str()
        .map_err(|_| AuthError::Unauthorized(UnauthorizedReason::Malformed))?;

    let (scheme, credential) = match header.trim().split_once(' ') {
        Some((scheme, credential)) => (scheme, credential.trim()),
        None => (header.trim(), ""),
    };

    if credential.is_empty() {
        return Err(AuthError::Unauthorized(UnauthorizedReason::MissingCredential));
    }
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized(UnauthorizedReason::Malformed));
    }

    Ok(credential)
}
