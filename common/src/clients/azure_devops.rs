// Azure DevOps repository provisioning client
//
// The upstream create/delete/rename endpoints operate on opaque identifiers,
// not names, so every operation first resolves the project or repository name
// to its id with a lookup call.

use crate::config::AzureDevOpsConfig;
use crate::errors::UpstreamError;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const API_VERSION: &str = "7.1-preview.1";

/// Client for the Azure DevOps Git REST API.
///
/// Authentication is Basic with an empty username and the personal access
/// token as the password, as the Azure DevOps REST API expects.
pub struct AzureDevOpsClient {
    client: Client,
    base_url: String,
    pat: String,
}

impl AzureDevOpsClient {
    pub fn new(config: &AzureDevOpsConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: config.base_url(),
            pat: config.pat.clone(),
        })
    }

    /// Resolve a project name to its opaque project id
    async fn project_id(&self, project_name: &str) -> Result<String, UpstreamError> {
        let url = format!(
            "{}/_apis/projects/{}?api-version={}",
            self.base_url, project_name, API_VERSION
        );

        let response = self
            .client
            .get(&url)
            .basic_auth("", Some(&self.pat))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::from_status(response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::Response(format!("Failed to parse project: {}", e)))?;

        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                UpstreamError::Response(format!(
                    "Project '{}' response is missing an id",
                    project_name
                ))
            })
    }

    /// Resolve a repository name to its opaque repository id.
    ///
    /// A 404 from the upstream is surfaced as `NotFound` so callers can map
    /// it distinctly from other failures.
    async fn repository_id(
        &self,
        project_name: &str,
        repo_name: &str,
    ) -> Result<String, UpstreamError> {
        let url = format!(
            "{}/{}/_apis/git/repositories/{}?api-version={}",
            self.base_url, project_name, repo_name, API_VERSION
        );

        let response = self
            .client
            .get(&url)
            .basic_auth("", Some(&self.pat))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound(format!(
                "Repository '{}' not found in project '{}'",
                repo_name, project_name
            )));
        }
        if !response.status().is_success() {
            return Err(UpstreamError::from_status(response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::Response(format!("Failed to parse repository: {}", e)))?;

        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                UpstreamError::Response(format!(
                    "Repository '{}' response is missing an id",
                    repo_name
                ))
            })
    }

    /// Create a Git repository inside the named project
    #[tracing::instrument(skip(self))]
    pub async fn create_repository(
        &self,
        project_name: &str,
        repo_name: &str,
    ) -> Result<Value, UpstreamError> {
        let project_id = self.project_id(project_name).await?;
        let url = format!(
            "{}/{}/_apis/git/repositories?api-version={}",
            self.base_url, project_name, API_VERSION
        );

        let response = self
            .client
            .post(&url)
            .basic_auth("", Some(&self.pat))
            .json(&json!({
                "name": repo_name,
                "project": { "id": project_id },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Repository creation failed");
            return Err(UpstreamError::from_status(status));
        }

        tracing::info!(project = project_name, repo = repo_name, "Repository created");
        response
            .json()
            .await
            .map_err(|e| UpstreamError::Response(format!("Failed to parse repository: {}", e)))
    }

    /// Delete a repository by name.
    ///
    /// `NotFound` from the name resolution propagates untouched.
    #[tracing::instrument(skip(self))]
    pub async fn delete_repository(
        &self,
        project_name: &str,
        repo_name: &str,
    ) -> Result<(), UpstreamError> {
        let repo_id = self.repository_id(project_name, repo_name).await?;
        let url = format!(
            "{}/{}/_apis/git/repositories/{}?api-version={}",
            self.base_url, project_name, repo_id, API_VERSION
        );

        let response = self
            .client
            .delete(&url)
            .basic_auth("", Some(&self.pat))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::from_status(response.status()));
        }

        tracing::info!(project = project_name, repo = repo_name, "Repository deleted");
        Ok(())
    }

    /// Rename a repository.
    ///
    /// `NotFound` from the name resolution propagates untouched.
    #[tracing::instrument(skip(self))]
    pub async fn rename_repository(
        &self,
        project_name: &str,
        repo_name: &str,
        new_name: &str,
    ) -> Result<Value, UpstreamError> {
        let repo_id = self.repository_id(project_name, repo_name).await?;
        let url = format!(
            "{}/{}/_apis/git/repositories/{}?api-version={}",
            self.base_url, project_name, repo_id, API_VERSION
        );

        let response = self
            .client
            .patch(&url)
            .basic_auth("", Some(&self.pat))
            .json(&json!({ "name": new_name }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Repository rename failed");
            return Err(UpstreamError::from_status(status));
        }

        tracing::info!(
            project = project_name,
            repo = repo_name,
            new_name = new_name,
            "Repository renamed"
        );
        response
            .json()
            .await
            .map_err(|e| UpstreamError::Response(format!("Failed to parse repository: {}", e)))
    }
}
