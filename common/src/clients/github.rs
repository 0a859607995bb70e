// GitHub repository provisioning client

use crate::config::GitHubConfig;
use crate::errors::UpstreamError;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

const ACCEPT: &str = "application/vnd.github.v3+json";
const API_VERSION: &str = "2022-11-28";

/// Fixed page size for repository listings. No further pages are fetched.
const PER_PAGE: u32 = 100;

/// Options accepted when creating a repository, plain or from a template.
///
/// Wire names follow the inbound API contract (camelCase for the two
/// multi-word flags).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRepositoryOptions {
    pub name: String,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub private: Option<bool>,
    #[serde(rename = "includeAllBranches")]
    pub include_all_branches: Option<bool>,
    #[serde(rename = "autoInit")]
    pub auto_init: Option<bool>,
}

/// Client for the GitHub REST API v3
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    fn with_api_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Accept", ACCEPT)
            .header("Authorization", format!("token {}", self.token))
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Generate a new repository from a template repository
    #[tracing::instrument(skip(self, options))]
    pub async fn create_repository_from_template(
        &self,
        template_owner: &str,
        template_repo: &str,
        options: &CreateRepositoryOptions,
    ) -> Result<Value, UpstreamError> {
        let url = format!(
            "{}/repos/{}/{}/generate",
            self.base_url, template_owner, template_repo
        );

        let body = json!({
            "owner": options.owner.as_deref().unwrap_or(template_owner),
            "name": options.name,
            "description": options.description,
            "private": options.private,
            "include_all_branches": options.include_all_branches.unwrap_or(false),
        });

        let response = self
            .with_api_headers(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(template_not_found(template_owner, template_repo));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Template generation failed");
            return Err(UpstreamError::from_status(status));
        }

        tracing::info!(
            template = %format!("{}/{}", template_owner, template_repo),
            name = %options.name,
            "Repository generated from template"
        );
        response
            .json()
            .await
            .map_err(|e| UpstreamError::Response(format!("Failed to parse repository: {}", e)))
    }

    /// Create a plain repository.
    ///
    /// The upstream call always creates under the authenticated user,
    /// regardless of any owner requested in the options. Known surface
    /// inconsistency, kept as-is.
    #[tracing::instrument(skip(self, options))]
    pub async fn create_repository(
        &self,
        options: &CreateRepositoryOptions,
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}/user/repos", self.base_url);

        let body = json!({
            "name": options.name,
            "description": options.description,
            "private": options.private,
            "auto_init": options.auto_init.unwrap_or(false),
        });

        let response = self
            .with_api_headers(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Repository creation failed");
            return Err(UpstreamError::from_status(status));
        }

        tracing::info!(name = %options.name, "Repository created");
        response
            .json()
            .await
            .map_err(|e| UpstreamError::Response(format!("Failed to parse repository: {}", e)))
    }

    /// Best-effort listing of repositories that may have been generated from
    /// a template.
    ///
    /// GitHub exposes no signal tying a repository back to its template, so
    /// this compares creation timestamps: any of the authenticated user's
    /// repositories created strictly after the template counts as a
    /// candidate. The result carries no confidence beyond that.
    #[tracing::instrument(skip(self))]
    pub async fn repositories_from_template(
        &self,
        template_owner: &str,
        template_repo: &str,
    ) -> Result<Vec<Value>, UpstreamError> {
        let template_url = format!("{}/repos/{}/{}", self.base_url, template_owner, template_repo);
        let response = self
            .with_api_headers(self.client.get(&template_url))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(template_not_found(template_owner, template_repo));
        }
        if !response.status().is_success() {
            return Err(UpstreamError::from_status(response.status()));
        }

        let template: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::Response(format!("Failed to parse template: {}", e)))?;

        let template_created_at = template
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .ok_or_else(|| {
                UpstreamError::Response(format!(
                    "Template '{}/{}' response is missing a creation timestamp",
                    template_owner, template_repo
                ))
            })?;

        let repos = self.user_repositories().await?;
        Ok(created_after(repos, template_created_at))
    }

    /// List up to one page of the authenticated user's repositories
    #[tracing::instrument(skip(self))]
    pub async fn user_repositories(&self) -> Result<Vec<Value>, UpstreamError> {
        let url = format!("{}/user/repos?per_page={}", self.base_url, PER_PAGE);
        let response = self
            .with_api_headers(self.client.get(&url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::from_status(response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Response(format!("Failed to parse repositories: {}", e)))
    }
}

fn template_not_found(owner: &str, repo: &str) -> UpstreamError {
    UpstreamError::NotFound(format!(
        "Template repository '{}' not found for owner '{}'",
        repo, owner
    ))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Keep only repositories created strictly after the cutoff. Repositories
/// with a missing or unparsable `created_at` are dropped.
fn created_after(repos: Vec<Value>, cutoff: DateTime<Utc>) -> Vec<Value> {
    repos
        .into_iter()
        .filter(|repo| {
            repo.get("created_at")
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
                .is_some_and(|created| created > cutoff)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repo(name: &str, created_at: &str) -> Value {
        json!({ "name": name, "created_at": created_at })
    }

    #[test]
    fn test_created_after_is_strictly_greater() {
        let cutoff = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let repos = vec![
            repo("before", "2024-06-01T11:59:59Z"),
            repo("exact", "2024-06-01T12:00:00Z"),
            repo("after", "2024-06-01T12:00:01Z"),
        ];

        let result = created_after(repos, cutoff);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["name"], "after");
    }

    #[test]
    fn test_created_after_drops_unparsable_timestamps() {
        let cutoff = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let repos = vec![
            repo("garbage", "not-a-date"),
            json!({ "name": "missing" }),
            repo("kept", "2024-06-02T00:00:00Z"),
        ];

        let result = created_after(repos, cutoff);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["name"], "kept");
    }

    #[test]
    fn test_create_options_accept_camel_case_flags() {
        let options: CreateRepositoryOptions = serde_json::from_value(json!({
            "name": "demo",
            "includeAllBranches": true,
            "autoInit": true,
        }))
        .unwrap();

        assert_eq!(options.name, "demo");
        assert_eq!(options.include_all_branches, Some(true));
        assert_eq!(options.auto_init, Some(true));
        assert!(options.owner.is_none());
    }
}
