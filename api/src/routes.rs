use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the main application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Azure DevOps repository facade
    let azure_devops_routes = Router::new()
        .route(
            "/azure-devops/projects/:project_name/repositories",
            post(handlers::azure_devops::create_repository),
        )
        .route(
            "/azure-devops/projects/:project_name/repositories/:repo_name",
            delete(handlers::azure_devops::delete_repository)
                .patch(handlers::azure_devops::update_repository),
        );

    // GitHub repository facade
    let github_routes = Router::new()
        .route(
            "/github/templates/:owner/:repo/generate",
            post(handlers::github::create_repository_from_template),
        )
        .route(
            "/github/repositories",
            post(handlers::github::create_repository),
        )
        .route(
            "/github/templates/:owner/:repo/repositories",
            get(handlers::github::repositories_from_template),
        )
        .route(
            "/github/user/repositories",
            get(handlers::github::user_repositories),
        );

    // Jira board provisioning facade
    let jira_routes = Router::new()
        .route("/jira/test-connection", get(handlers::jira::test_connection))
        .route("/jira/create-board/:name", post(handlers::jira::create_board));

    // Service endpoints (no provider credentials involved)
    let service_routes = Router::new()
        .route("/api/info", get(handlers::index::index))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::metrics_handler));

    // Combine all routes
    Router::new()
        .merge(azure_devops_routes)
        .merge(github_routes)
        .merge(jira_routes)
        .merge(service_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
