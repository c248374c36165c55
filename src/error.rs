//! Errors raised by the CoWIN API client.

use thiserror::Error;

/// Failures talking to the CoWIN API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Server returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ApiError {
    /// Rate limiting and server-side failures are worth retrying on the next poll.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Request { .. } => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Decode { .. } | ApiError::Client(_) => false,
        }
    }
}
