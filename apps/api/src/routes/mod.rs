pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/auth/google", post(handlers::handle_google_login))
        .route("/api/profile", get(handlers::handle_profile))
        .with_state(state)
}
