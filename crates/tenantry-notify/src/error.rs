//! Notification error types.

use thiserror::Error;

/// Result type for notification operations
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors raised while notifying the remote service
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The configured base URL or path does not form a valid URL
    #[error("Invalid notification URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed
    #[error("Failed to build notification client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request never produced a response (connect, TLS, timeout)
    #[error("Notification transport failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The remote service answered with a non-success status
    #[error("Notification rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}
