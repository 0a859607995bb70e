// Jira board provisioning client
//
// Board creation is a fixed three-step sequence: find-or-create the project,
// create a saved filter, create a Scrum board wired to both. A failure at any
// step aborts the whole operation; artifacts already created by that call are
// left in place.

use crate::config::JiraConfig;
use crate::errors::UpstreamError;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

const PROJECT_TYPE_KEY: &str = "software";
const PROJECT_TEMPLATE_KEY: &str =
    "com.pyxis.greenhopper.jira:basic-software-development-template";
const BOARD_TYPE: &str = "scrum";

/// Maximum length of a derived project key
const PROJECT_KEY_MAX_LEN: usize = 10;

/// Composite result of a full board provisioning run
#[derive(Debug, Serialize)]
pub struct BoardProvision {
    pub board: Value,
    pub project: Value,
    pub filter: Value,
}

/// Derive a Jira project key from a board name: strip everything that is not
/// an ASCII alphanumeric, truncate to 10 characters, uppercase.
pub fn derive_project_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .take(PROJECT_KEY_MAX_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Client for the Jira Cloud REST API v3 and Agile API v1.0.
///
/// The calling account's id is fetched once and cached for the life of the
/// client; there is no invalidation.
pub struct JiraClient {
    client: Client,
    base_url: String,
    email: String,
    token: String,
    account_id: OnceCell<String>,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: config.base_url.clone(),
            email: config.email.clone(),
            token: config.api_token.clone(),
            account_id: OnceCell::new(),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).basic_auth(&self.email, Some(&self.token))
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url).basic_auth(&self.email, Some(&self.token))
    }

    /// Get the calling account's id, fetching it from `/myself` at most once
    /// per client lifetime
    async fn account_id(&self) -> Result<String, UpstreamError> {
        let id = self
            .account_id
            .get_or_try_init(|| async {
                let url = format!("{}/rest/api/3/myself", self.base_url);
                let response = self.get(&url).send().await?;

                if !response.status().is_success() {
                    return Err(UpstreamError::from_status(response.status()));
                }

                let body: Value = response.json().await.map_err(|e| {
                    UpstreamError::Response(format!("Failed to parse identity: {}", e))
                })?;

                let account_id = body
                    .get("accountId")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        UpstreamError::Response(
                            "Identity response is missing an accountId".to_string(),
                        )
                    })?;

                tracing::info!(account_id = %account_id, "Retrieved Jira account id");
                Ok(account_id)
            })
            .await?;

        Ok(id.clone())
    }

    /// Find an existing project by name or create a new one.
    ///
    /// The search match is a case-insensitive exact name comparison. A failed
    /// search is deliberately treated as "not found" and logged as a warning:
    /// when resolution is ambiguous the flow proceeds to creation rather than
    /// failing.
    #[tracing::instrument(skip(self))]
    pub async fn create_or_get_project(&self, name: &str) -> Result<Value, UpstreamError> {
        match self.search_project(name).await {
            Ok(Some(existing)) => {
                tracing::info!(
                    project = %existing["name"],
                    key = %existing["key"],
                    "Found existing project"
                );
                return Ok(existing);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Error searching for project; creating a new one");
            }
        }

        let key = derive_project_key(name);
        let account_id = self.account_id().await?;

        tracing::info!(name = name, key = %key, lead = %account_id, "Creating new Jira project");

        let url = format!("{}/rest/api/3/project", self.base_url);
        let response = self
            .post(&url)
            .json(&json!({
                "key": key,
                "name": name,
                "projectTypeKey": PROJECT_TYPE_KEY,
                "leadAccountId": account_id,
                "projectTemplateKey": PROJECT_TEMPLATE_KEY,
            }))
            .send()
            .await?;

        let project = check_and_parse(response, "project").await?;
        tracing::info!(project = %project["name"], key = %project["key"], "Project created");
        Ok(project)
    }

    async fn search_project(&self, name: &str) -> Result<Option<Value>, UpstreamError> {
        let url = format!(
            "{}/rest/api/3/project/search?query={}",
            self.base_url,
            urlencoding::encode(name)
        );
        let response = self.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(UpstreamError::from_status(response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::Response(format!("Failed to parse search: {}", e)))?;

        let wanted = name.to_lowercase();
        let found = body
            .get("values")
            .and_then(Value::as_array)
            .and_then(|candidates| {
                candidates
                    .iter()
                    .find(|p| {
                        p.get("name")
                            .and_then(Value::as_str)
                            .is_some_and(|n| n.to_lowercase() == wanted)
                    })
                    .cloned()
            });

        Ok(found)
    }

    /// Create a saved filter selecting the project's issues, newest first
    #[tracing::instrument(skip(self))]
    pub async fn create_filter(
        &self,
        name: &str,
        project_key: &str,
    ) -> Result<Value, UpstreamError> {
        let jql = format!("project = {} ORDER BY created DESC", project_key);

        let url = format!("{}/rest/api/3/filter", self.base_url);
        let response = self
            .post(&url)
            .json(&json!({
                "name": format!("{} Filter", name),
                "description": format!("Filter for {} board", name),
                "jql": jql,
                // No sharing by default; global share permissions are rejected
                "sharePermissions": [],
            }))
            .send()
            .await?;

        let filter = check_and_parse(response, "filter").await?;
        tracing::info!(filter = %filter["name"], id = %filter["id"], "Filter created");
        Ok(filter)
    }

    /// Provision a Scrum board: find-or-create the project, create its
    /// filter, then create the board bound to both. Strictly sequential, no
    /// rollback on failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_board(&self, name: &str) -> Result<BoardProvision, UpstreamError> {
        tracing::info!(name = name, "Starting Jira board provisioning");

        let project = self.create_or_get_project(name).await?;
        let project_key = project
            .get("key")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                UpstreamError::Response("Project response is missing a key".to_string())
            })?;

        let filter = self.create_filter(name, &project_key).await?;

        tracing::info!(
            name = name,
            project = %project_key,
            filter = %filter["id"],
            "Creating board"
        );

        let url = format!("{}/rest/agile/1.0/board", self.base_url);
        let response = self
            .post(&url)
            .json(&json!({
                "name": name,
                "type": BOARD_TYPE,
                "filterId": filter["id"],
                "location": {
                    "projectKeyOrId": project_key,
                    "type": "project",
                },
            }))
            .send()
            .await?;

        let board = check_and_parse(response, "board").await?;
        tracing::info!(name = name, "Jira board created");

        Ok(BoardProvision {
            board,
            project,
            filter,
        })
    }

    /// Check that the configured credentials can reach Jira.
    ///
    /// Never fails to the caller: every failure is logged and reduced to
    /// `false`.
    #[tracing::instrument(skip(self))]
    pub async fn test_connection(&self) -> bool {
        let url = format!("{}/rest/api/3/myself", self.base_url);

        let response = match self.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "Jira connection test failed");
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::error!(status = %response.status(), "Jira connection test failed");
            return false;
        }

        match response.json::<Value>().await {
            Ok(body) => {
                tracing::info!(
                    display_name = %body["displayName"],
                    "Jira connection test successful"
                );
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "Jira connection test failed");
                false
            }
        }
    }
}

/// Treat any non-2xx response as failure: log the status and body, raise an
/// error carrying the upstream status text
async fn check_and_parse(response: Response, what: &str) -> Result<Value, UpstreamError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, body = %body, "Jira {} creation failed", what);
        return Err(UpstreamError::from_status(status));
    }

    response
        .json()
        .await
        .map_err(|e| UpstreamError::Response(format!("Failed to parse {}: {}", what, e)))
}
