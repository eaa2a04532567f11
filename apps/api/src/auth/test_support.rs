//! Fixtures shared by the auth and route tests: a fake Google signing key,
//! its published key set, and a token builder.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::auth::google::GoogleIdTokenVerifier;
use crate::auth::jwks::{KeySource, KeySourceError};

pub const PROVIDER_KEY_PEM: &str = include_str!("testdata/provider_key.pem");
pub const ROGUE_KEY_PEM: &str = include_str!("testdata/rogue_key.pem");
pub const PROVIDER_JWKS: &str = include_str!("testdata/provider_jwks.json");
pub const PROVIDER_KID: &str = "test-key-1";
pub const TEST_CLIENT_ID: &str = "career-test.apps.googleusercontent.com";
pub const TEST_SESSION_SECRET: &str = "test-session-secret-that-is-long-enough";

pub fn provider_key_set() -> Arc<JwkSet> {
    Arc::new(serde_json::from_str(PROVIDER_JWKS).unwrap())
}

/// Key source with a fixed key set before and after a forced refresh.
pub struct StaticKeySource {
    initial: Arc<JwkSet>,
    refreshed: Arc<JwkSet>,
    pub refreshes: AtomicUsize,
}

impl StaticKeySource {
    pub fn new(keys: Arc<JwkSet>) -> Self {
        Self::rotating(keys.clone(), keys)
    }

    pub fn rotating(initial: Arc<JwkSet>, refreshed: Arc<JwkSet>) -> Self {
        Self {
            initial,
            refreshed,
            refreshes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn key_set(&self, force_refresh: bool) -> Result<Arc<JwkSet>, KeySourceError> {
        if force_refresh {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            return Ok(self.refreshed.clone());
        }
        Ok(self.initial.clone())
    }
}

/// Key source whose endpoint is always down.
pub struct UnreachableKeySource;

#[async_trait]
impl KeySource for UnreachableKeySource {
    async fn key_set(&self, _force_refresh: bool) -> Result<Arc<JwkSet>, KeySourceError> {
        Err(KeySourceError::Status(503))
    }
}

pub fn test_verifier() -> GoogleIdTokenVerifier {
    GoogleIdTokenVerifier::new(
        TEST_CLIENT_ID,
        Arc::new(StaticKeySource::new(provider_key_set())),
    )
    .unwrap()
}

/// Builds Google-shaped ID tokens. Defaults produce a token the test verifier
/// accepts.
pub struct GoogleTokenBuilder {
    sub: String,
    aud: String,
    iss: String,
    expires_in_secs: i64,
    kid: Option<String>,
    key_pem: &'static str,
}

impl GoogleTokenBuilder {
    pub fn new(sub: &str) -> Self {
        Self {
            sub: sub.to_string(),
            aud: TEST_CLIENT_ID.to_string(),
            iss: "https://accounts.google.com".to_string(),
            expires_in_secs: 3600,
            kid: Some(PROVIDER_KID.to_string()),
            key_pem: PROVIDER_KEY_PEM,
        }
    }

    pub fn audience(mut self, aud: &str) -> Self {
        self.aud = aud.to_string();
        self
    }

    pub fn issuer(mut self, iss: &str) -> Self {
        self.iss = iss.to_string();
        self
    }

    pub fn expires_in(mut self, secs: i64) -> Self {
        self.expires_in_secs = secs;
        self
    }

    pub fn kid(mut self, kid: Option<&str>) -> Self {
        self.kid = kid.map(str::to_string);
        self
    }

    pub fn signed_with(mut self, key_pem: &'static str) -> Self {
        self.key_pem = key_pem;
        self
    }

    /// Signs with a shared secret instead of the provider's RSA key, keeping
    /// the provider's key id in the header.
    pub fn sign_hs256(self, secret: &[u8]) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = self.kid.clone();
        encode(&header, &self.claims(), &EncodingKey::from_secret(secret)).unwrap()
    }

    pub fn sign(self) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.kid.clone();
        let key = EncodingKey::from_rsa_pem(self.key_pem.as_bytes()).unwrap();
        encode(&header, &self.claims(), &key).unwrap()
    }

    fn claims(&self) -> serde_json::Value {
        let now = Utc::now().timestamp();
        json!({
            "iss": self.iss,
            "aud": self.aud,
            "sub": self.sub,
            "email": format!("user{}@example.com", self.sub),
            "email_verified": true,
            "name": "Ada Lovelace",
            "picture": "https://example.com/ada.png",
            "iat": now - 60,
            "exp": now + self.expires_in_secs,
        })
    }
}
