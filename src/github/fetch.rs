// src/github/fetch.rs
// =============================================================================
// Builds a RepositoryDescriptor for one repository.
//
// How it works:
// 1. Parse the identifier into owner/name
// 2. Fetch repository metadata and language stats
// 3. Walk the file tree breadth-first, starting at the root
// 4. Download text files until the file budget runs out
// 5. Pick out dependency manifests from the downloaded files
//
// Subdirectory failures are logged and skipped, except rate limiting, which
// always aborts: every further request would fail the same way.
// =============================================================================

use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use super::client::{ContentItem, GitHubClient};
use super::descriptor::{EntryKind, Manifest, ManifestKind, RepoEntry, RepoFile, RepositoryDescriptor};
use super::identifier::{parse_identifier, RepoRef};
use crate::analyzer::languages;
use crate::error::{ForgeError, Result};

/// Directories that never contain anything worth describing.
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    "target",
    "dist",
    "venv",
    ".venv",
];

/// How many file bodies of one directory are downloaded at once.
const DOWNLOAD_CONCURRENCY: usize = 4;

/// Limits for the file walk.
#[derive(Debug, Clone)]
pub struct FetchLimits {
    /// Maximum number of files downloaded per repository.
    pub max_files: usize,
    /// Files larger than this are listed but not downloaded.
    pub max_file_bytes: u64,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_files: 50,
            max_file_bytes: 100_000,
        }
    }
}

/// Retrieves repository data from GitHub.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: GitHubClient,
    limits: FetchLimits,
}

impl Fetcher {
    pub fn new(client: GitHubClient, limits: FetchLimits) -> Self {
        Self { client, limits }
    }

    /// Fetches everything we need to describe `identifier`.
    pub async fn fetch(&self, identifier: &str) -> Result<RepositoryDescriptor> {
        // Step 1: Resolve owner/name; bad input never reaches the network
        let repo = parse_identifier(identifier)?;
        info!(repository = %repo, "fetching repository");

        // Step 2: Metadata and byte counts per language
        let info = self.client.repo_info(&repo).await?;
        let languages = self.client.languages(&repo).await?;

        // Step 3: The root listing doubles as the top-level layout
        let top_level = match self.client.list_dir(&repo, "").await {
            Ok(items) => items.iter().map(to_entry).collect(),
            // An empty repository has metadata but no contents
            Err(ForgeError::NotFound { .. }) => {
                warn!(repository = %repo, "repository has no contents");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        // Step 4: Download file bodies, breadth-first, within the budget
        let files = self.walk(&repo, &top_level).await?;
        info!(repository = %repo, files = files.len(), "fetched repository files");

        // Step 5: Any downloaded file with a known manifest name is a manifest,
        // wherever it sits in the tree
        let manifests = files
            .iter()
            .filter_map(|file| {
                ManifestKind::detect(file.file_name()).map(|kind| Manifest {
                    path: file.path.clone(),
                    kind,
                    content: file.content.clone(),
                })
            })
            .collect();

        // GitHub leaves `language` empty for some repos; count extensions instead
        let primary_language = info
            .language
            .clone()
            .or_else(|| languages::primary_language(&files));

        Ok(RepositoryDescriptor {
            identifier: identifier.to_string(),
            owner: repo.owner.clone(),
            name: info.name.clone(),
            description: info.description.clone().filter(|d| !d.trim().is_empty()),
            primary_language,
            languages,
            license: info.license.as_ref().and_then(|l| l.label()),
            homepage: info.homepage.clone().filter(|h| !h.trim().is_empty()),
            default_branch: info.default_branch.clone(),
            stars: info.stargazers_count,
            forks: info.forks_count,
            topics: info.topics.clone(),
            top_level,
            files,
            manifests,
        })
    }

    // Breadth-first walk over the tree, root listing already in hand
    async fn walk(&self, repo: &RepoRef, root: &[RepoEntry]) -> Result<Vec<RepoFile>> {
        let mut files = Vec::new();
        // Each queue item is one directory's listing
        let mut queue: VecDeque<Vec<RepoEntry>> = VecDeque::new();
        queue.push_back(root.to_vec());

        while let Some(entries) = queue.pop_front() {
            // Stop as soon as the file budget is spent
            if files.len() >= self.limits.max_files {
                break;
            }

            let budget = self.limits.max_files - files.len();
            // Only plain files small enough to be worth reading
            let wanted: Vec<&RepoEntry> = entries
                .iter()
                .filter(|e| e.kind == EntryKind::File)
                .filter(|e| {
                    let small = e.size <= self.limits.max_file_bytes;
                    if !small {
                        debug!(path = %e.path, size = e.size, "skipping large file");
                    }
                    small
                })
                .collect();

            // A rate limit here aborts the whole walk (the `?`)
            let downloaded = self.download(repo, &wanted, budget).await?;
            files.extend(downloaded);

            // Queue subdirectories, skipping vendored and build output
            for dir in entries.iter().filter(|e| e.kind == EntryKind::Dir) {
                if should_skip(&dir.path) {
                    continue;
                }
                match self.client.list_dir(repo, &dir.path).await {
                    Ok(items) => queue.push_back(items.iter().map(to_entry).collect()),
                    Err(e @ ForgeError::RateLimit { .. }) => return Err(e),
                    // One unreadable directory should not sink the whole README
                    Err(e) => warn!(path = %dir.path, error = %e, "failed to list directory"),
                }
            }
        }

        Ok(files)
    }

    // Downloads up to `budget` files, keeping listing order
    async fn download(
        &self,
        repo: &RepoRef,
        entries: &[&RepoEntry],
        budget: usize,
    ) -> Result<Vec<RepoFile>> {
        let results: Vec<Option<RepoFile>> = stream::iter(entries.iter().copied().take(budget))
            .map(|entry| async move {
                match self.client.file_content(repo, &entry.path).await {
                    Ok(Some(content)) => Ok(Some(RepoFile {
                        path: entry.path.clone(),
                        size: entry.size,
                        content,
                    })),
                    Ok(None) => {
                        debug!(path = %entry.path, "skipping binary file");
                        Ok(None)
                    }
                    Err(e @ ForgeError::RateLimit { .. }) => Err(e),
                    Err(e) => {
                        warn!(path = %entry.path, error = %e, "failed to download file");
                        Ok(None)
                    }
                }
            })
            .buffered(DOWNLOAD_CONCURRENCY)
            .try_collect()
            .await?;

        Ok(results.into_iter().flatten().collect())
    }
}

fn to_entry(item: &ContentItem) -> RepoEntry {
    let kind = match item.kind.as_str() {
        "file" => EntryKind::File,
        "dir" => EntryKind::Dir,
        _ => EntryKind::Other,
    };
    RepoEntry {
        path: item.path.clone(),
        kind,
        size: item.size,
    }
}

fn should_skip(path: &str) -> bool {
    path.split('/').any(|part| SKIP_DIRS.contains(&part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_skip_vendor_dirs() {
        assert!(should_skip("node_modules"));
        assert!(should_skip("web/node_modules"));
        assert!(should_skip("src/__pycache__"));
        assert!(!should_skip("src"));
        assert!(!should_skip("docs/targets"));
    }

    #[test]
    fn test_to_entry_kinds() {
        let item = ContentItem {
            path: "vendor/lib".to_string(),
            kind: "submodule".to_string(),
            size: 0,
        };
        assert_eq!(to_entry(&item).kind, EntryKind::Other);
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_identifier_without_network() {
        let client = GitHubClient::new(
            crate::github::DEFAULT_API_URL,
            None,
            std::time::Duration::from_secs(5),
        )
        .unwrap();
        let fetcher = Fetcher::new(client, FetchLimits::default());
        let err = fetcher.fetch("").await.unwrap_err();
        assert!(matches!(err, ForgeError::InvalidIdentifier(_)));
    }
}

// =============================================================================
// BEGINNER NOTES:
//
// 1. Why VecDeque?
//    push_back + pop_front gives first-in, first-out order, so every file in
//    the root is considered before anything one level down. Shallow files
//    (manifests, entry points) are the most useful and get the budget first.
//
// 2. What does `.buffered(4)` do?
//    It runs up to 4 downloads at once but yields results in the original
//    order, unlike `.buffer_unordered()`. Same listing, same README.
//
// 3. What is `e @ ForgeError::RateLimit { .. }`?
//    An `@` binding: match the pattern and keep the whole value in `e`, so
//    it can be returned unchanged.
// =============================================================================
