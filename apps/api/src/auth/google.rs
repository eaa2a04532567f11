//! Google ID token verification.
//!
//! A token is trusted only when every check passes: RS256 signature against a
//! key from Google's published set, `aud` equal to our client id, `iss` one of
//! Google's issuers, and an unexpired `exp`. There is no partial trust.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::errors::AuthError;
use crate::auth::identity::{IdentityClaim, IdentityVerifier};
use crate::auth::jwks::KeySource;

pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];
/// Tolerated clock skew between us and Google when checking `exp`.
const CLOCK_SKEW_LEEWAY_SECS: u64 = 60;

/// The subset of Google's ID token payload we consume.
#[derive(Debug, Deserialize)]
struct GoogleIdTokenClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

pub struct GoogleIdTokenVerifier {
    client_id: String,
    keys: Arc<dyn KeySource>,
}

impl GoogleIdTokenVerifier {
    pub fn new(client_id: impl Into<String>, keys: Arc<dyn KeySource>) -> Result<Self, AuthError> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(AuthError::Configuration(
                "Google client id must be non-empty".to_string(),
            ));
        }
        Ok(Self { client_id, keys })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation.validate_exp = true;
        validation.leeway = CLOCK_SKEW_LEEWAY_SECS;
        validation
    }

    /// Resolves `kid` to a decoding key, refreshing the key set once if the
    /// id is unknown.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let keys = self.keys.key_set(false).await.map_err(key_source_failure)?;

        let jwk = match keys.find(kid) {
            Some(jwk) => jwk.clone(),
            None => {
                debug!("Signing key {kid} not in cached set, refreshing");
                let refreshed = self.keys.key_set(true).await.map_err(key_source_failure)?;
                refreshed.find(kid).cloned().ok_or_else(|| {
                    AuthError::InvalidIdentityToken(format!("unknown signing key {kid}"))
                })?
            }
        };

        DecodingKey::from_jwk(&jwk)
            .map_err(|e| AuthError::InvalidIdentityToken(format!("unusable signing key: {e}")))
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdTokenVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        let header = decode_header(token).map_err(|e| {
            AuthError::InvalidIdentityToken(format!("undecodable header: {e}"))
        })?;

        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidIdentityToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidIdentityToken("missing key id".to_string()))?;

        let key = self.decoding_key(&kid).await?;
        let data = decode::<GoogleIdTokenClaims>(token, &key, &self.validation())
            .map_err(|e| AuthError::InvalidIdentityToken(describe_rejection(&e).to_string()))?;

        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidIdentityToken("empty subject".to_string()));
        }

        Ok(IdentityClaim::from_verified(
            claims.sub,
            claims.email,
            claims.name,
            claims.picture,
        ))
    }
}

fn key_source_failure(e: crate::auth::jwks::KeySourceError) -> AuthError {
    warn!("Could not load identity provider keys: {e}");
    AuthError::InvalidIdentityToken(format!("signing keys unavailable: {e}"))
}

fn describe_rejection(error: &jsonwebtoken::errors::Error) -> &'static str {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => "signature mismatch",
        ErrorKind::ExpiredSignature => "token has expired",
        ErrorKind::InvalidAudience => "audience mismatch",
        ErrorKind::InvalidIssuer => "issuer mismatch",
        ErrorKind::MissingRequiredClaim(_) => "missing required claim",
        _ => "malformed token",
    }
}
