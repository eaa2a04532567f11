use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No credential, or the server refused the stored one. Treat as logged out.
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Request rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
