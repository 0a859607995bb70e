use axum::Json;
use serde_json::{json, Value};

/// Service information endpoint
#[tracing::instrument]
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "provision-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "azure_devops": [
                "POST /azure-devops/projects/:project_name/repositories",
                "DELETE /azure-devops/projects/:project_name/repositories/:repo_name",
                "PATCH /azure-devops/projects/:project_name/repositories/:repo_name",
            ],
            "github": [
                "POST /github/templates/:owner/:repo/generate",
                "POST /github/repositories",
                "GET /github/templates/:owner/:repo/repositories",
                "GET /github/user/repositories",
            ],
            "jira": [
                "GET /jira/test-connection",
                "POST /jira/create-board/:name",
            ],
        },
    }))
}
