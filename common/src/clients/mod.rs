// Thin client wrappers, one per upstream provisioning API

pub mod azure_devops;
pub mod github;
pub mod jira;

use crate::errors::UpstreamError;

/// Build the shared reqwest client used by all provider wrappers.
///
/// No request timeout is configured: upstream failures surface only as
/// connection errors or non-2xx statuses.
pub(crate) fn build_http_client() -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| UpstreamError::Request(format!("Failed to create HTTP client: {}", e)))
}
