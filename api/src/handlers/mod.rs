pub mod azure_devops;
pub mod github;
pub mod health;
pub mod index;
pub mod jira;
pub mod metrics;

// Common response types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use common::errors::UpstreamError;

/// Standard API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub trace_id: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Translate an upstream client error into a response.
    ///
    /// `NotFound` passes through untouched; everything else is wrapped with
    /// the contextual message, keeping the original message text.
    pub fn from_upstream(context: &str, err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound(message) => ErrorResponse::new("not_found", message),
            other => ErrorResponse::new("upstream_error", format!("{}: {}", context, other)),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_passes_through_unwrapped() {
        let err = UpstreamError::NotFound("Repository 'x' not found".to_string());
        let response = ErrorResponse::from_upstream("Failed to delete repository", err);
        assert_eq!(response.error, "not_found");
        assert_eq!(response.message, "Repository 'x' not found");
    }

    #[test]
    fn test_other_errors_are_wrapped_with_context() {
        let err = UpstreamError::Request("connection refused".to_string());
        let response = ErrorResponse::from_upstream("Failed to create repository", err);
        assert_eq!(response.error, "upstream_error");
        assert!(response.message.starts_with("Failed to create repository:"));
        assert!(response.message.contains("connection refused"));
    }
}
