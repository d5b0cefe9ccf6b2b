// src/github/descriptor.rs
// =============================================================================
// The data the fetcher hands to the rest of the pipeline.
//
// A RepositoryDescriptor is built once per run and never mutated afterwards;
// the synthesizer and analyzer only borrow it.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;

/// Everything we learned about one repository.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryDescriptor {
    /// The identifier exactly as the caller supplied it.
    pub identifier: String,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub primary_language: Option<String>,
    /// Language name -> bytes of code, as reported by the hosting API.
    pub languages: BTreeMap<String, u64>,
    /// SPDX id when known, otherwise the license's display name.
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub default_branch: String,
    pub stars: u64,
    pub forks: u64,
    pub topics: Vec<String>,
    /// Entries of the repository root.
    pub top_level: Vec<RepoEntry>,
    /// Text files downloaded during the walk, in listing order.
    pub files: Vec<RepoFile>,
    /// Dependency manifests found among `files`.
    pub manifests: Vec<Manifest>,
}

impl RepositoryDescriptor {
    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.name)
    }

    /// Looks up a downloaded file by exact path.
    pub fn file(&self, path: &str) -> Option<&RepoFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn manifest(&self, kind: ManifestKind) -> Option<&Manifest> {
        self.manifests.iter().find(|m| m.kind == kind)
    }

    pub fn has_top_level(&self, name: &str) -> bool {
        self.top_level.iter().any(|e| e.path.eq_ignore_ascii_case(name))
    }
}

/// One item of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoEntry {
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks and submodules; listed but never walked.
    Other,
}

/// A downloaded text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoFile {
    pub path: String,
    pub size: u64,
    #[serde(skip_serializing)]
    pub content: String,
}

impl RepoFile {
    /// Last path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// A dependency manifest and its raw contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub path: String,
    pub kind: ManifestKind,
    #[serde(skip_serializing)]
    pub content: String,
}

/// Recognized dependency manifest formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestKind {
    Requirements,
    PyProject,
    SetupPy,
    PackageJson,
    CargoToml,
    GoMod,
    Gemfile,
    ComposerJson,
    PomXml,
    BuildGradle,
}

impl ManifestKind {
    /// Classifies a file by its name (not its full path).
    pub fn detect(file_name: &str) -> Option<ManifestKind> {
        let kind = match file_name {
            "requirements.txt" => ManifestKind::Requirements,
            "pyproject.toml" => ManifestKind::PyProject,
            "setup.py" => ManifestKind::SetupPy,
            "package.json" => ManifestKind::PackageJson,
            "Cargo.toml" => ManifestKind::CargoToml,
            "go.mod" => ManifestKind::GoMod,
            "Gemfile" => ManifestKind::Gemfile,
            "composer.json" => ManifestKind::ComposerJson,
            "pom.xml" => ManifestKind::PomXml,
            "build.gradle" | "build.gradle.kts" => ManifestKind::BuildGradle,
            _ => return None,
        };
        Some(kind)
    }

    /// Ecosystem label used when listing dependencies.
    pub fn ecosystem(self) -> &'static str {
        match self {
            ManifestKind::Requirements | ManifestKind::PyProject | ManifestKind::SetupPy => {
                "Python"
            }
            ManifestKind::PackageJson => "JavaScript",
            ManifestKind::CargoToml => "Rust",
            ManifestKind::GoMod => "Go",
            ManifestKind::Gemfile => "Ruby",
            ManifestKind::ComposerJson => "PHP",
            ManifestKind::PomXml | ManifestKind::BuildGradle => "Java",
        }
    }
}
