use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::handlers::ErrorResponse;
use crate::state::AppState;
use common::clients::github::CreateRepositoryOptions;
use common::telemetry;

/// Create a new repository generated from a template repository
#[tracing::instrument(skip(state, options))]
pub async fn create_repository_from_template(
    State(state): State<AppState>,
    Path((template_owner, template_repo)): Path<(String, String)>,
    Json(options): Json<CreateRepositoryOptions>,
) -> Result<Json<Value>, ErrorResponse> {
    telemetry::record_upstream_request("github", "create_repository_from_template");

    let repo = state
        .github
        .create_repository_from_template(&template_owner, &template_repo, &options)
        .await
        .map_err(|e| {
            telemetry::record_upstream_failure("github", "create_repository_from_template");
            ErrorResponse::from_upstream("Failed to create repository from template", e)
        })?;

    Ok(Json(repo))
}

/// Create a plain repository for the authenticated user
#[tracing::instrument(skip(state, options))]
pub async fn create_repository(
    State(state): State<AppState>,
    Json(options): Json<CreateRepositoryOptions>,
) -> Result<Json<Value>, ErrorResponse> {
    telemetry::record_upstream_request("github", "create_repository");

    let repo = state.github.create_repository(&options).await.map_err(|e| {
        telemetry::record_upstream_failure("github", "create_repository");
        ErrorResponse::from_upstream("Failed to create repository", e)
    })?;

    Ok(Json(repo))
}

/// Best-effort list of repositories possibly generated from a template
#[tracing::instrument(skip(state))]
pub async fn repositories_from_template(
    State(state): State<AppState>,
    Path((template_owner, template_repo)): Path<(String, String)>,
) -> Result<Json<Vec<Value>>, ErrorResponse> {
    telemetry::record_upstream_request("github", "repositories_from_template");

    let repos = state
        .github
        .repositories_from_template(&template_owner, &template_repo)
        .await
        .map_err(|e| {
            telemetry::record_upstream_failure("github", "repositories_from_template");
            ErrorResponse::from_upstream("Failed to retrieve repositories", e)
        })?;

    Ok(Json(repos))
}

/// List up to one page of the authenticated user's repositories
#[tracing::instrument(skip(state))]
pub async fn user_repositories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, ErrorResponse> {
    telemetry::record_upstream_request("github", "user_repositories");

    let repos = state.github.user_repositories().await.map_err(|e| {
        telemetry::record_upstream_failure("github", "user_repositories");
        ErrorResponse::from_upstream("Failed to fetch user repositories", e)
    })?;

    Ok(Json(repos))
}
