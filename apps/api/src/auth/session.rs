//! Session credentials: issuance and validation.
//!
//! A credential is an HS256 JWT over `SessionClaims`, valid for exactly
//! `SESSION_TTL_SECS` after issuance. It is valid iff its signature verifies
//! against the server secret and `now < exp`. No revocation, no refresh.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::errors::{AuthError, UnauthorizedReason};
use crate::auth::identity::IdentityClaim;

pub const SESSION_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    email: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    picture: Option<String>,
    iat: i64,
    exp: i64,
}

/// The identity subset embedded in a session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
}

impl From<&IdentityClaim> for SessionUser {
    fn from(claim: &IdentityClaim) -> Self {
        Self {
            subject_id: claim.subject_id().to_string(),
            email: claim.email().to_string(),
            display_name: claim.display_name().to_string(),
        }
    }
}

/// Opaque signed session credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A credential that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSession {
    pub user: SessionUser,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

fn require_secret(secret: &str) -> Result<&[u8], AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Configuration(
            "session signing secret must be non-empty".to_string(),
        ));
    }
    Ok(secret.as_bytes())
}

#[derive(Clone)]
pub struct SessionIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        Ok(Self {
            key: EncodingKey::from_secret(require_secret(secret)?),
            ttl: Duration::seconds(SESSION_TTL_SECS),
        })
    }

    /// Signs a credential for a verified identity. Timestamps are truncated to
    /// whole seconds, so the output is deterministic per claim and second.
    pub fn issue(
        &self,
        claim: &IdentityClaim,
        issued_at: DateTime<Utc>,
    ) -> Result<SessionToken, AuthError> {
        let iat = issued_at.timestamp();
        let claims = SessionClaims {
            sub: claim.subject_id().to_string(),
            email: claim.email().to_string(),
            name: claim.display_name().to_string(),
            picture: claim.avatar_url().map(str::to_string),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map(SessionToken)
            .map_err(|e| AuthError::Configuration(format!("failed to sign session: {e}")))
    }
}

#[derive(Clone)]
pub struct SessionValidator {
    key: DecodingKey,
    validation: Validation,
}

impl SessionValidator {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock below, with no leeway.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            key: DecodingKey::from_secret(require_secret(secret)?),
            validation,
        })
    }

    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<ValidatedSession, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthorized(UnauthorizedReason::MissingCredential));
        }

        let claims = decode::<SessionClaims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::Unauthorized(classify(&e)))?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::Unauthorized(UnauthorizedReason::Expired));
        }

        let malformed = || AuthError::Unauthorized(UnauthorizedReason::Malformed);
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or_else(malformed)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or_else(malformed)?;

        Ok(ValidatedSession {
            user: SessionUser {
                subject_id: claims.sub,
                email: claims.email,
                display_name: claims.name,
            },
            issued_at,
            expires_at,
        })
    }
}

fn classify(error: &jsonwebtoken::errors::Error) -> UnauthorizedReason {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => UnauthorizedReason::BadSignature,
        ErrorKind::ExpiredSignature => UnauthorizedReason::Expired,
        _ => UnauthorizedReason::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::auth::test_support::TEST_SESSION_SECRET;

    fn claim() -> IdentityClaim {
        IdentityClaim::from_verified(
            "42".to_string(),
            Some("ada@example.com".to_string()),
            Some("Ada Lovelace".to_string()),
            None,
        )
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn pair() -> (SessionIssuer, SessionValidator) {
        (
            SessionIssuer::new(TEST_SESSION_SECRET).unwrap(),
            SessionValidator::new(TEST_SESSION_SECRET).unwrap(),
        )
    }

    fn reason(result: Result<ValidatedSession, AuthError>) -> UnauthorizedReason {
        match result {
            Err(AuthError::Unauthorized(reason)) => reason,
            other => panic!("Expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_returns_claim_subset() {
        let (issuer, validator) = pair();
        let token = issuer.issue(&claim(), issued_at()).unwrap();
        let session = validator.validate(token.as_str(), issued_at()).unwrap();

        assert_eq!(session.user, SessionUser::from(&claim()));
        assert_eq!(session.issued_at, issued_at());
        assert_eq!(session.expires_at, issued_at() + Duration::hours(1));
    }

    #[test]
    fn test_accepted_until_one_hour_boundary() {
        let (issuer, validator) = pair();
        let token = issuer.issue(&claim(), issued_at()).unwrap();

        let last_valid = issued_at() + Duration::seconds(SESSION_TTL_SECS - 1);
        assert!(validator.validate(token.as_str(), last_valid).is_ok());

        let boundary = issued_at() + Duration::seconds(SESSION_TTL_SECS);
        assert_eq!(
            reason(validator.validate(token.as_str(), boundary)),
            UnauthorizedReason::Expired
        );

        let much_later = issued_at() + Duration::days(2);
        assert_eq!(
            reason(validator.validate(token.as_str(), much_later)),
            UnauthorizedReason::Expired
        );
    }

    #[test]
    fn test_issuance_is_deterministic() {
        let (issuer, _) = pair();
        let first = issuer.issue(&claim(), issued_at()).unwrap();
        let second = issuer.issue(&claim(), issued_at()).unwrap();
        assert_eq!(first, second);

        let later = issuer
            .issue(&claim(), issued_at() + Duration::seconds(1))
            .unwrap();
        assert_ne!(first, later);
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let foreign = SessionIssuer::new("a-completely-different-secret").unwrap();
        let (_, validator) = pair();
        let token = foreign.issue(&claim(), issued_at()).unwrap();

        assert_eq!(
            reason(validator.validate(token.as_str(), issued_at())),
            UnauthorizedReason::BadSignature
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let (issuer, validator) = pair();
        let token = issuer.issue(&claim(), issued_at()).unwrap().as_str().to_string();

        let other = IdentityClaim::from_verified("43".to_string(), None, None, None);
        let other_token = issuer.issue(&other, issued_at()).unwrap().as_str().to_string();

        // Splice the second payload under the first signature.
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other_token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(
            reason(validator.validate(&forged, issued_at())),
            UnauthorizedReason::BadSignature
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let (_, validator) = pair();
        assert_eq!(
            reason(validator.validate("definitely.not.ajwt", issued_at())),
            UnauthorizedReason::Malformed
        );
        assert_eq!(
            reason(validator.validate("", issued_at())),
            UnauthorizedReason::MissingCredential
        );
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        assert!(matches!(
            SessionIssuer::new(""),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            SessionValidator::new(""),
            Err(AuthError::Configuration(_))
        ));
    }
}
