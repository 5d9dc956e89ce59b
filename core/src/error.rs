//! Error types for the items API client.
//!
//! # Design
//! Each failure class gets its own variant so callers can tell a bad base URL
//! from a network failure, a cancelled call, a rejected request, and a body
//! that does not decode. Status-specific variants carry the data needed for a
//! useful message (`user_id` for 404, the numeric status otherwise).

/// Failures raised by a `Transport` before any HTTP status is available.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cancellation token fired while the request was in flight.
    #[error("request cancelled")]
    Cancelled,
}

/// Errors returned by `QiitaClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The base URL given at construction could not be used.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection-level failure (DNS, refused, TLS, I/O).
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    #[error("request cancelled")]
    Cancelled,

    /// The server returned 400.
    #[error("bad request. some parameters may be invalid")]
    InvalidParameters,

    /// The server returned 404 for the requested user.
    #[error("not found. user with id '{user_id}' may not exist")]
    UserNotFound { user_id: String },

    /// Any status other than 200, 400 and 404.
    #[error("unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    /// The server returned 200 but the body is not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Cancelled => ApiError::Cancelled,
            other => ApiError::Transport(other),
        }
    }
}
