// tests/common/mod.rs
// Shared fixtures: a fake GitHub API serving one small Flask repository.

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use readme_forge::Settings;

pub const APP_PY: &str = "from flask import Flask\n\napp = Flask(__name__)\n\n@app.route('/')\ndef index():\n    return 'ok'\n";
pub const REQUIREMENTS: &str = "flask==2.3.0\nrequests>=2.31\n";
pub const UTIL_PY: &str = "def slugify(text):\n    return text.lower().replace(' ', '-')\n";

/// Settings pointing at the mock server, without a text-generation backend.
pub fn settings(server: &MockServer) -> Settings {
    Settings {
        github_api_url: server.uri(),
        github_token: Some("test-token".to_string()),
        openai_api_key: None,
        timeout_secs: 5,
        llm_timeout_secs: 5,
        ..Settings::default()
    }
}

pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serves a file the way the contents API does: base64, wrapped at 60 columns.
pub async fn mount_file(server: &MockServer, repo_path: &str, content: &str) {
    let encoded = STANDARD.encode(content);
    let wrapped: Vec<String> = encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect();

    mount_json(
        server,
        &format!("/repos/octo/demo/contents/{}", repo_path),
        json!({
            "type": "file",
            "path": repo_path,
            "encoding": "base64",
            "content": wrapped.join("\n"),
        }),
    )
    .await;
}

pub async fn mount_metadata(server: &MockServer, description: Option<&str>) {
    mount_json(
        server,
        "/repos/octo/demo",
        json!({
            "name": "demo",
            "description": description,
            "language": "Python",
            "license": { "spdx_id": "MIT", "name": "MIT License" },
            "homepage": null,
            "default_branch": "main",
            "stargazers_count": 42,
            "forks_count": 7,
            "topics": ["flask", "api"],
        }),
    )
    .await;
    mount_json(server, "/repos/octo/demo/languages", json!({ "Python": 2048 })).await;
}

/// A complete repository: metadata, a root listing with one subdirectory
/// and one directory that must never be listed.
pub async fn mount_repository(server: &MockServer, description: Option<&str>) {
    mount_metadata(server, description).await;

    mount_json(
        server,
        "/repos/octo/demo/contents",
        json!([
            { "path": "app.py", "type": "file", "size": APP_PY.len() },
            { "path": "requirements.txt", "type": "file", "size": REQUIREMENTS.len() },
            { "path": "big.csv", "type": "file", "size": 5_000_000 },
            { "path": "src", "type": "dir", "size": 0 },
            { "path": "node_modules", "type": "dir", "size": 0 },
        ]),
    )
    .await;
    mount_json(
        server,
        "/repos/octo/demo/contents/src",
        json!([{ "path": "src/util.py", "type": "file", "size": UTIL_PY.len() }]),
    )
    .await;

    mount_file(server, "app.py", APP_PY).await;
    mount_file(server, "requirements.txt", REQUIREMENTS).await;
    mount_file(server, "src/util.py", UTIL_PY).await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/contents/node_modules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/contents/big.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(server)
        .await;
}
