// Integration tests for the GitHub client against a mocked upstream

use common::clients::github::{CreateRepositoryOptions, GitHubClient};
use common::config::GitHubConfig;
use common::errors::UpstreamError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GitHubClient {
    GitHubClient::new(&GitHubConfig {
        token: "tkn".to_string(),
        base_url: server.uri(),
    })
    .unwrap()
}

fn options(name: &str) -> CreateRepositoryOptions {
    serde_json::from_value(json!({ "name": name })).unwrap()
}

#[tokio::test]
async fn template_generation_sends_api_headers_and_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/starter/generate"))
        .and(header("authorization", "token tkn"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        // Owner falls back to the template owner; branch flag defaults off
        .and(body_json(json!({
            "owner": "acme",
            "name": "new-service",
            "description": null,
            "private": null,
            "include_all_branches": false,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "new-service",
            "owner": { "login": "acme" },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = client_for(&server)
        .create_repository_from_template("acme", "starter", &options("new-service"))
        .await
        .unwrap();

    assert_eq!(repo["name"], "new-service");
    server.verify().await;
}

#[tokio::test]
async fn missing_template_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/ghost/generate"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_repository_from_template("acme", "ghost", &options("new-service"))
        .await
        .unwrap_err();

    match err {
        UpstreamError::NotFound(message) => {
            assert!(message.contains("ghost"));
            assert!(message.contains("acme"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn plain_create_always_targets_the_authenticated_user() {
    let server = MockServer::start().await;

    // The requested owner is ignored by the upstream call
    let opts: CreateRepositoryOptions = serde_json::from_value(json!({
        "name": "demo",
        "owner": "someone-else",
        "autoInit": true,
    }))
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .and(body_json(json!({
            "name": "demo",
            "description": null,
            "private": null,
            "auto_init": true,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "name": "demo" })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).create_repository(&opts).await.unwrap();
    server.verify().await;
}

#[tokio::test]
async fn template_derivation_keeps_only_strictly_newer_repos() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/starter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "starter",
            "created_at": "2024-06-01T12:00:00Z",
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "older", "created_at": "2024-06-01T11:59:59Z" },
            { "name": "same-instant", "created_at": "2024-06-01T12:00:00Z" },
            { "name": "newer", "created_at": "2024-06-01T12:00:01Z" },
        ])))
        .mount(&server)
        .await;

    let repos = client_for(&server)
        .repositories_from_template("acme", "starter")
        .await
        .unwrap();

    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0]["name"], "newer");
}

#[tokio::test]
async fn template_derivation_with_missing_template_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .repositories_from_template("acme", "ghost")
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::NotFound(_)));
}

#[tokio::test]
async fn user_repositories_requests_one_fixed_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "one" },
            { "name": "two" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repos = client_for(&server).user_repositories().await.unwrap();
    assert_eq!(repos.len(), 2);
    server.verify().await;
}

#[tokio::test]
async fn listing_failure_is_a_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).user_repositories().await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 401, .. }));
}
