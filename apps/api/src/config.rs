use anyhow::{Context, Result};

use crate::auth::jwks::GOOGLE_CERTS_URL;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or empty.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth client id registered with Google; expected `aud` of every ID token.
    pub google_client_id: String,
    /// HMAC secret used to sign session credentials.
    pub jwt_secret: String,
    pub google_certs_url: String,
    /// Browser origin allowed by CORS (the front end's dev server by default).
    pub allowed_origin: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            google_client_id: require("GOOGLE_CLIENT_ID")?,
            jwt_secret: require("JWT_SECRET")?,
            google_certs_url: lookup("GOOGLE_CERTS_URL")
                .unwrap_or_else(|| GOOGLE_CERTS_URL.to_string()),
            allowed_origin: lookup("ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
