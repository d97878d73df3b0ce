//! Vision client error types.

use thiserror::Error;

/// Result type for vision client operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur while classifying an image.
///
/// An unrecognized bin code is deliberately NOT an error: the backend
/// returning text that does not follow the prompt format is a model
/// quality issue, surfaced as `BinCode::Unrecognized` instead.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Image encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Client configuration error: {0}")]
    ConfigError(String),

    #[error("Credential rejected: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Backend error ({0}): {1}")]
    BackendError(u16, String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {0}: {1}")]
    UnknownStatus(u16, String),
}

impl VisionError {
    pub fn encoding_failed(msg: impl Into<String>) -> Self {
        Self::EncodingFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Map a non-2xx HTTP status to the error taxonomy.
    pub fn from_http_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            401 => Self::Unauthorized(detail),
            429 => Self::RateLimited(detail),
            500..=599 => Self::BackendError(status, detail),
            _ => Self::UnknownStatus(status, detail),
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            VisionError::Unauthorized(_) => Some(401),
            VisionError::RateLimited(_) => Some(429),
            VisionError::BackendError(status, _) => Some(*status),
            VisionError::UnknownStatus(status, _) => Some(*status),
            VisionError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if error is retryable.
    ///
    /// The client itself never retries; callers use this to drive their
    /// own retry policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VisionError::Transport(_)
                | VisionError::RateLimited(_)
                | VisionError::BackendError(_, _)
        )
    }
}
