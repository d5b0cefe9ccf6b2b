// src/github/client.rs
// =============================================================================
// Thin wrapper around the GitHub REST API (v3).
//
// Endpoints used:
// - GET /repos/{owner}/{repo}                  repository metadata
// - GET /repos/{owner}/{repo}/languages        bytes of code per language
// - GET /repos/{owner}/{repo}/contents/{path}  directory listings and files
//
// Every response goes through `check_status`, which is where HTTP status
// codes become NotFound / RateLimit / Network errors.
// =============================================================================

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::identifier::RepoRef;
use crate::error::{ForgeError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repository metadata, the subset of fields we use.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub license: Option<LicenseInfo>,
    pub homepage: Option<String>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseInfo {
    pub spdx_id: Option<String>,
    pub name: Option<String>,
}

impl LicenseInfo {
    /// Prefers the SPDX id; GitHub uses "NOASSERTION" for unknown licenses.
    pub fn label(&self) -> Option<String> {
        match self.spdx_id.as_deref() {
            Some(id) if !id.is_empty() && id != "NOASSERTION" => Some(id.to_string()),
            _ => self.name.clone().filter(|n| !n.is_empty()),
        }
    }
}

/// One entry of a contents listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct FileBody {
    encoding: Option<String>,
    content: Option<String>,
}

/// Authenticated (or anonymous) GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    /// Builds a client with a per-request timeout.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ForgeError::Config(format!("invalid GitHub API URL '{}': {}", base_url, e)))?;

        // GitHub rejects requests without a User-Agent
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("readme-forge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ForgeError::Config(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub async fn repo_info(&self, repo: &RepoRef) -> Result<RepoInfo> {
        let url = self.endpoint(repo, &[], "")?;
        let response = self.get(url, repo).await?;
        Ok(response.json().await?)
    }

    pub async fn languages(&self, repo: &RepoRef) -> Result<BTreeMap<String, u64>> {
        let url = self.endpoint(repo, &["languages"], "")?;
        let response = self.get(url, repo).await?;
        Ok(response.json().await?)
    }

    /// Lists a directory ("" is the repository root).
    pub async fn list_dir(&self, repo: &RepoRef, path: &str) -> Result<Vec<ContentItem>> {
        let url = self.endpoint(repo, &["contents"], path)?;
        let response = self.get(url, repo).await?;
        Ok(response.json().await?)
    }

    /// Downloads a file.
    ///
    /// Returns `Ok(None)` for binary files and bodies GitHub does not inline.
    pub async fn file_content(&self, repo: &RepoRef, path: &str) -> Result<Option<String>> {
        let url = self.endpoint(repo, &["contents"], path)?;
        let response = self.get(url, repo).await?;
        let body: FileBody = response.json().await?;
        Ok(decode_body(body))
    }

    fn endpoint(&self, repo: &RepoRef, tail: &[&str], path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ForgeError::Config(format!("GitHub API URL cannot be a base: {}", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .push("repos")
                .push(&repo.owner)
                .push(&repo.name)
                .extend(tail);
            segments.extend(path.split('/').filter(|p| !p.is_empty()));
        }
        Ok(url)
    }

    async fn get(&self, url: Url, repo: &RepoRef) -> Result<Response> {
        debug!(%url, "GitHub request");
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        check_status(response, repo)
    }
}

/// Maps HTTP status codes onto our error taxonomy.
fn check_status(response: Response, repo: &RepoRef) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let reset_at = header("x-ratelimit-reset").and_then(|v| v.parse().ok());
    let exhausted = header("x-ratelimit-remaining").as_deref() == Some("0");
    let secondary = header("retry-after").is_some();

    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(ForgeError::RateLimit { reset_at }),
        StatusCode::FORBIDDEN if exhausted || secondary => Err(ForgeError::RateLimit { reset_at }),
        StatusCode::NOT_FOUND | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(ForgeError::NotFound {
                repository: repo.to_string(),
            })
        }
        _ => Err(ForgeError::Network(format!(
            "HTTP {} from {}",
            status.as_u16(),
            response.url()
        ))),
    }
}

fn decode_body(body: FileBody) -> Option<String> {
    let content = body.content?;
    match body.encoding.as_deref() {
        Some("base64") => {
            // GitHub wraps base64 at 60 columns
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = STANDARD.decode(compact).ok()?;
            String::from_utf8(bytes).ok()
        }
        // "none" means the file was too large to inline
        Some("none") => None,
        _ => Some(content),
    }
}
