// Error handling framework for the upstream provider clients

use thiserror::Error;

/// Errors raised while calling an upstream provider API.
///
/// `NotFound` is the only variant callers are expected to branch on: it is
/// preserved through every layer and surfaces as a 404-class response. All
/// other variants are wrapped with a contextual message at the handler
/// boundary and surface as 500-class responses.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{0}")]
    NotFound(String),

    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("unexpected upstream response: {0}")]
    Response(String),
}

impl UpstreamError {
    /// Build a `Status` error from a reqwest status code, using the
    /// canonical reason phrase as the message.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        UpstreamError::Status {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Request(err.to_string())
    }
}
