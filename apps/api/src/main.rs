mod auth;
mod config;
mod errors;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{GoogleIdTokenVerifier, HttpKeySource};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting career auth API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize identity verification against Google's published keys
    let keys = HttpKeySource::new(config.google_certs_url.clone())?;
    let verifier = GoogleIdTokenVerifier::new(config.google_client_id.clone(), Arc::new(keys))?;
    info!("Google ID token verifier initialized (keys: {})", config.google_certs_url);

    let state = AppState::new(&config, Arc::new(verifier))?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS restricted to the configured front-end origin.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("ALLOWED_ORIGIN '{}' is not a valid origin", config.allowed_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}
