// tests/fetch.rs
// Fetcher behavior against a mocked GitHub API.

mod common;

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use readme_forge::github::{FetchLimits, GitHubClient, ManifestKind};
use readme_forge::{ForgeError, Fetcher};

fn fetcher(server: &MockServer, max_files: usize) -> Fetcher {
    let client = GitHubClient::new(
        &server.uri(),
        Some("test-token".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();
    Fetcher::new(
        client,
        FetchLimits {
            max_files,
            max_file_bytes: 100_000,
        },
    )
}

#[tokio::test]
async fn test_fetch_builds_descriptor() {
    let server = MockServer::start().await;
    common::mount_repository(&server, Some("A tiny Flask API")).await;

    let identifier = "https://github.com/octo/demo";
    let descriptor = fetcher(&server, 50).fetch(identifier).await.unwrap();

    assert_eq!(descriptor.identifier, identifier);
    assert_eq!(descriptor.full_name(), "octo/demo");
    assert_eq!(descriptor.description.as_deref(), Some("A tiny Flask API"));
    assert_eq!(descriptor.primary_language.as_deref(), Some("Python"));
    assert_eq!(descriptor.license.as_deref(), Some("MIT"));
    assert_eq!(descriptor.stars, 42);
    assert_eq!(descriptor.languages["Python"], 2048);
    assert_eq!(descriptor.top_level.len(), 5);

    let paths: Vec<&str> = descriptor.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["app.py", "requirements.txt", "src/util.py"]);
    assert_eq!(descriptor.file("app.py").unwrap().content, common::APP_PY);

    let manifest = descriptor.manifest(ManifestKind::Requirements).unwrap();
    assert_eq!(manifest.content, common::REQUIREMENTS);
}

#[tokio::test]
async fn test_fetch_respects_file_budget() {
    let server = MockServer::start().await;
    common::mount_repository(&server, None).await;

    let descriptor = fetcher(&server, 1).fetch("octo/demo").await.unwrap();
    assert_eq!(descriptor.files.len(), 1);
    assert_eq!(descriptor.files[0].path, "app.py");
}

#[tokio::test]
async fn test_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "demo" })))
        .expect(1)
        .mount(&server)
        .await;
    common::mount_json(&server, "/repos/octo/demo/languages", json!({})).await;
    common::mount_json(&server, "/repos/octo/demo/contents", json!([])).await;

    let descriptor = fetcher(&server, 50).fetch("octo/demo").await.unwrap();
    assert_eq!(descriptor.default_branch, "main");
    assert!(descriptor.files.is_empty());
}

#[tokio::test]
async fn test_missing_repository_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let err = fetcher(&server, 50).fetch("octo/missing").await.unwrap_err();
    match err {
        ForgeError::NotFound { repository } => assert_eq!(repository, "octo/missing"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exhausted_quota_is_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000")
                .set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    let err = fetcher(&server, 50).fetch("octo/demo").await.unwrap_err();
    assert!(matches!(
        err,
        ForgeError::RateLimit {
            reset_at: Some(1_700_000_000)
        }
    ));
    assert_eq!(err.kind(), "rate_limit");
}

#[tokio::test]
async fn test_rate_limit_during_walk_aborts() {
    let server = MockServer::start().await;
    common::mount_metadata(&server, None).await;
    common::mount_json(
        &server,
        "/repos/octo/demo/contents",
        json!([{ "path": "main.py", "type": "file", "size": 10 }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/contents/main.py"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = fetcher(&server, 50).fetch("octo/demo").await.unwrap_err();
    assert!(matches!(err, ForgeError::RateLimit { .. }));
}

#[tokio::test]
async fn test_server_error_is_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = fetcher(&server, 50).fetch("octo/demo").await.unwrap_err();
    assert!(matches!(err, ForgeError::Network(_)));
}

#[tokio::test]
async fn test_empty_repository_has_no_files() {
    let server = MockServer::start().await;
    common::mount_metadata(&server, None).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/contents"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "This repository is empty." })),
        )
        .mount(&server)
        .await;

    let descriptor = fetcher(&server, 50).fetch("octo/demo").await.unwrap();
    assert!(descriptor.top_level.is_empty());
    assert!(descriptor.files.is_empty());
    assert!(descriptor.manifests.is_empty());
}

#[tokio::test]
async fn test_invalid_identifier_makes_no_requests() {
    let server = MockServer::start().await;
    let err = fetcher(&server, 50).fetch("not a repo").await.unwrap_err();
    assert!(matches!(err, ForgeError::InvalidIdentifier(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_forbidden_without_quota_headers_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden" })))
        .mount(&server)
        .await;

    let err = fetcher(&server, 50).fetch("octo/demo").await.unwrap_err();
    match err {
        ForgeError::NotFound { repository } => assert_eq!(repository, "octo/demo"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/private"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })))
        .mount(&server)
        .await;

    let err = fetcher(&server, 50).fetch("octo/private").await.unwrap_err();
    assert!(matches!(err, ForgeError::NotFound { .. }));
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_forbidden_with_retry_after_is_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("retry-after", "60")
                .set_body_json(json!({ "message": "You have exceeded a secondary rate limit" })),
        )
        .mount(&server)
        .await;

    let err = fetcher(&server, 50).fetch("octo/demo").await.unwrap_err();
    assert!(matches!(err, ForgeError::RateLimit { reset_at: None }));
}

#[tokio::test]
async fn test_failed_subdirectory_listing_is_skipped() {
    let server = MockServer::start().await;
    common::mount_metadata(&server, None).await;
    common::mount_json(
        &server,
        "/repos/octo/demo/contents",
        json!([
            { "path": "app.py", "type": "file", "size": common::APP_PY.len() },
            { "path": "src", "type": "dir", "size": 0 },
        ]),
    )
    .await;
    common::mount_file(&server, "app.py", common::APP_PY).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/contents/src"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = fetcher(&server, 50).fetch("octo/demo").await.unwrap();
    assert_eq!(descriptor.files.len(), 1);
    assert_eq!(descriptor.files[0].path, "app.py");
    assert_eq!(descriptor.top_level.len(), 2);
}
