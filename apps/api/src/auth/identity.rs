//! Verified identity produced by an identity-token verifier.
//!
//! `IdentityClaim` has no public constructor: the only way to obtain one is a
//! successful `IdentityVerifier::verify`, which is what lets the session issuer
//! accept it without re-checking anything.

use async_trait::async_trait;

use crate::auth::errors::AuthError;

/// Identity attributes taken from a verified third-party token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    subject_id: String,
    email: String,
    display_name: String,
    avatar_url: Option<String>,
}

impl IdentityClaim {
    /// Restricted to the `auth` module, where verifiers live.
    pub(super) fn from_verified(
        subject_id: String,
        email: Option<String>,
        display_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            subject_id,
            email: email.unwrap_or_default(),
            display_name: display_name.unwrap_or_default(),
            avatar_url,
        }
    }

    /// Stable, opaque provider subject (`sub`).
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

/// Verifies a third-party identity token. Implement this to swap identity
/// providers without touching handlers.
///
/// Carried in `AppState` as `Arc<dyn IdentityVerifier>`.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError>;
}
