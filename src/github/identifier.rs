// src/github/identifier.rs
// =============================================================================
// Turns whatever the user typed into an (owner, name) pair.
//
// Supported formats:
//   - owner/repo
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - github.com/owner/repo
//   - https://github.com/owner/repo/tree/main/src   (extra segments ignored)
// =============================================================================

use std::fmt;
use url::Url;

use crate::error::{ForgeError, Result};

/// A resolved GitHub repository address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parses a repository identifier.
///
/// Example:
///   "https://github.com/rust-lang/rust" -> RepoRef { owner: "rust-lang", name: "rust" }
pub fn parse_identifier(input: &str) -> Result<RepoRef> {
    let trimmed = input.trim();
    let invalid = || ForgeError::InvalidIdentifier(input.to_string());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    let segments: Vec<String> = if trimmed.contains("://") {
        let url = Url::parse(trimmed).map_err(|_| invalid())?;
        match url.host_str() {
            Some("github.com") | Some("www.github.com") => {}
            _ => return Err(invalid()),
        }
        url.path_segments()
            .map(|parts| {
                parts
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    } else {
        // Only a whole github.com host counts; "www.foo/bar" stays a bare pair
        let (path, is_url) = match trimmed
            .strip_prefix("www.github.com/")
            .or_else(|| trimmed.strip_prefix("github.com/"))
        {
            Some(rest) => (rest, true),
            None => (trimmed, false),
        };
        let parts: Vec<String> = path
            .split('/')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        // A bare identifier is exactly owner/name
        if !is_url && parts.len() != 2 {
            return Err(invalid());
        }
        parts
    };

    if segments.len() < 2 {
        return Err(invalid());
    }

    let owner = segments[0].clone();
    let name = segments[1].trim_end_matches(".git").to_string();

    if !is_valid_owner(&owner) || !is_valid_name(&name) {
        return Err(invalid());
    }

    Ok(RepoRef { owner, name })
}

fn is_valid_owner(owner: &str) -> bool {
    !owner.is_empty() && owner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
