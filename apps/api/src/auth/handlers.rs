//! Axum route handlers for the authentication API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::extractor::AuthenticatedUser;
use crate::auth::session::SessionUser;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginResponse {
    pub message: &'static str,
    pub user: LoginUser,
    pub session_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWindow {
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user: SessionUser,
    pub session: SessionWindow,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/google
/// Exchanges a Google ID token for a session credential.
pub async fn handle_google_login(
    State(state): State<AppState>,
    body: Result<Json<GoogleLoginRequest>, JsonRejection>,
) -> Result<Json<GoogleLoginResponse>, AppError> {
    // An absent, unparsable or mistyped body carries no usable token.
    let token = body
        .map_err(|rejection| debug!("Rejected login body: {rejection}"))
        .ok()
        .and_then(|Json(req)| req.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("No token provided.".to_string()))?;

    let claim = state.verifier.verify(&token).await.map_err(|e| {
        warn!("Token verification failed: {e}");
        AppError::from(e)
    })?;

    let session_token = state.issuer.issue(&claim, Utc::now())?;
    info!("Issued session for subject {}", claim.subject_id());

    Ok(Json(GoogleLoginResponse {
        message: "Login successful",
        user: LoginUser {
            id: claim.subject_id().to_string(),
            email: claim.email().to_string(),
            name: claim.display_name().to_string(),
        },
        session_token: session_token.as_str().to_string(),
    }))
}

/// GET /api/profile
pub async fn handle_profile(
    AuthenticatedUser(session): AuthenticatedUser,
) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: "Profile data retrieved successfully.",
        user: session.user,
        session: SessionWindow {
            issued_at: session.issued_at,
            expires_at: session.expires_at,
        },
    })
}
