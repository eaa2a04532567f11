// Authentication core: identity-token verification, session issuance and
// validation, and the HTTP surface over them.

pub mod errors;
pub mod extractor;
pub mod google;
pub mod handlers;
pub mod identity;
pub mod jwks;
pub mod session;

#[cfg(test)]
pub mod test_support;

pub use errors::AuthError;
pub use google::GoogleIdTokenVerifier;
pub use identity::IdentityVerifier;
pub use jwks::HttpKeySource;
pub use session::{SessionIssuer, SessionValidator};
