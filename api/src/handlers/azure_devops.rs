use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::ErrorResponse;
use crate::state::AppState;
use common::telemetry;

/// Request to create a new repository
#[derive(Debug, Deserialize)]
pub struct CreateRepositoryRequest {
    #[serde(rename = "repoName")]
    pub repo_name: String,
}

/// Request to rename an existing repository
#[derive(Debug, Deserialize)]
pub struct UpdateRepositoryRequest {
    #[serde(rename = "newName")]
    pub new_name: String,
}

/// Create a Git repository inside the named Azure DevOps project
#[tracing::instrument(skip(state, req))]
pub async fn create_repository(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
    Json(req): Json<CreateRepositoryRequest>,
) -> Result<Json<Value>, ErrorResponse> {
    telemetry::record_upstream_request("azure_devops", "create_repository");

    let repo = state
        .azure_devops
        .create_repository(&project_name, &req.repo_name)
        .await
        .map_err(|e| {
            telemetry::record_upstream_failure("azure_devops", "create_repository");
            ErrorResponse::from_upstream("Failed to create repository", e)
        })?;

    Ok(Json(repo))
}

/// Delete a repository by name
#[tracing::instrument(skip(state))]
pub async fn delete_repository(
    State(state): State<AppState>,
    Path((project_name, repo_name)): Path<(String, String)>,
) -> Result<Json<Value>, ErrorResponse> {
    telemetry::record_upstream_request("azure_devops", "delete_repository");

    state
        .azure_devops
        .delete_repository(&project_name, &repo_name)
        .await
        .map_err(|e| {
            telemetry::record_upstream_failure("azure_devops", "delete_repository");
            ErrorResponse::from_upstream("Failed to delete repository", e)
        })?;

    Ok(Json(json!({ "message": "Repository deleted successfully" })))
}

/// Rename a repository
#[tracing::instrument(skip(state, req))]
pub async fn update_repository(
    State(state): State<AppState>,
    Path((project_name, repo_name)): Path<(String, String)>,
    Json(req): Json<UpdateRepositoryRequest>,
) -> Result<Json<Value>, ErrorResponse> {
    telemetry::record_upstream_request("azure_devops", "update_repository");

    let repo = state
        .azure_devops
        .rename_repository(&project_name, &repo_name, &req.new_name)
        .await
        .map_err(|e| {
            telemetry::record_upstream_failure("azure_devops", "update_repository");
            ErrorResponse::from_upstream("Failed to update repository", e)
        })?;

    Ok(Json(repo))
}
