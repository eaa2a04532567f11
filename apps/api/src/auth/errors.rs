use std::fmt;

use thiserror::Error;

/// Why a presented session credential was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// No `Authorization: Bearer` credential was presented at all.
    MissingCredential,
    Malformed,
    Expired,
    BadSignature,
}

impl UnauthorizedReason {
    /// A missing credential means "log in first"; everything else means the
    /// credential itself is no good.
    pub fn is_missing(self) -> bool {
        matches!(self, UnauthorizedReason::MissingCredential)
    }
}

impl fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnauthorizedReason::MissingCredential => "missing session credential",
            UnauthorizedReason::Malformed => "malformed session credential",
            UnauthorizedReason::Expired => "session credential has expired",
            UnauthorizedReason::BadSignature => "session credential signature mismatch",
        };
        f.write_str(text)
    }
}

/// Errors produced by the authentication core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The third-party identity token cannot be trusted. Terminal for that
    /// login attempt.
    #[error("Invalid identity token: {0}")]
    InvalidIdentityToken(String),

    /// Missing or unusable signing secret / client id.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(UnauthorizedReason),
}
