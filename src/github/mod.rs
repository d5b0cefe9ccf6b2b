// src/github/mod.rs
// =============================================================================
// This module fetches repository data from GitHub.
//
// Submodules:
// - identifier: owner/name and URL parsing
// - client: raw REST API calls and status code mapping
// - descriptor: the RepositoryDescriptor handed to the synthesizer
// - fetch: the file walk that ties the above together
// =============================================================================

mod client;
mod descriptor;
mod fetch;
mod identifier;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use descriptor::{EntryKind, Manifest, ManifestKind, RepoEntry, RepoFile, RepositoryDescriptor};
pub use fetch::{FetchLimits, Fetcher};
pub use identifier::{parse_identifier, RepoRef};
