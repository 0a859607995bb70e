use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::handlers::ErrorResponse;
use crate::state::AppState;
use common::clients::jira::BoardProvision;
use common::telemetry;

/// Check whether the configured Jira credentials work.
///
/// Always answers 200; failures are reported as `{ "success": false }`.
#[tracing::instrument(skip(state))]
pub async fn test_connection(State(state): State<AppState>) -> Json<Value> {
    let success = state.jira.test_connection().await;
    Json(json!({ "success": success }))
}

/// Provision a Scrum board: project, filter and board in one sequential run
#[tracing::instrument(skip(state))]
pub async fn create_board(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BoardProvision>, ErrorResponse> {
    telemetry::record_upstream_request("jira", "create_board");

    let provision = state.jira.create_board(&name).await.map_err(|e| {
        telemetry::record_upstream_failure("jira", "create_board");
        ErrorResponse::from_upstream("Failed to create Jira board", e)
    })?;

    Ok(Json(provision))
}
