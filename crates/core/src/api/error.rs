//! # API Errors
//!
//! Error taxonomy for calls against the remote catalog.

use thiserror::Error;

/// Failure of a single catalog call
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport, DNS or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// The requested resource id did not resolve
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Any other non-success status
    #[error("unexpected status {status} from {resource}: {body}")]
    Status {
        status: u16,
        resource: String,
        body: String,
    },

    /// The response body was not the expected JSON shape
    #[error("failed to decode response from {resource}: {message}")]
    Decode { resource: String, message: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}
