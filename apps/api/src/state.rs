use std::sync::Arc;

use crate::auth::{AuthError, IdentityVerifier, SessionIssuer, SessionValidator};
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable identity verifier. Default: GoogleIdTokenVerifier over Google's JWK set.
    pub verifier: Arc<dyn IdentityVerifier>,
    pub issuer: SessionIssuer,
    pub validator: SessionValidator,
}

impl AppState {
    /// Wires the session issuer and validator from the configured secret.
    /// A missing secret surfaces as `AuthError::Configuration`.
    pub fn new(config: &Config, verifier: Arc<dyn IdentityVerifier>) -> Result<Self, AuthError> {
        Ok(Self {
            verifier,
            issuer: SessionIssuer::new(&config.jwt_secret)?,
            validator: SessionValidator::new(&config.jwt_secret)?,
        })
    }
}
