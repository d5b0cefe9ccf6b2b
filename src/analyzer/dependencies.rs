// src/analyzer/dependencies.rs
// =============================================================================
// Reads dependency names out of manifest files.
//
// Only names are extracted, never versions. A manifest that fails to parse
// contributes nothing; it is not an error.
// =============================================================================

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::github::{Manifest, ManifestKind};

/// Dependency names grouped by ecosystem ("Python", "JavaScript", ...).
///
/// Names keep manifest order; duplicates within an ecosystem are dropped.
pub fn collect(manifests: &[Manifest]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for manifest in manifests {
        let names = parse(manifest);
        if names.is_empty() {
            continue;
        }
        let bucket = grouped.entry(manifest.kind.ecosystem().to_string()).or_default();
        for name in names {
            if !bucket.contains(&name) {
                bucket.push(name);
            }
        }
    }

    grouped
}

/// Dependency names declared by one manifest.
pub fn parse(manifest: &Manifest) -> Vec<String> {
    let content = manifest.content.as_str();
    let names = match manifest.kind {
        ManifestKind::Requirements => parse_requirements(content),
        ManifestKind::PackageJson => parse_json_keys(content, &["dependencies", "devDependencies"]),
        ManifestKind::ComposerJson => parse_json_keys(content, &["require", "require-dev"])
            .into_iter()
            .filter(|n| n != "php" && !n.starts_with("ext-"))
            .collect(),
        ManifestKind::CargoToml => parse_cargo(content),
        ManifestKind::PyProject => parse_pyproject(content),
        ManifestKind::GoMod => parse_go_mod(content),
        ManifestKind::Gemfile => parse_gemfile(content),
        ManifestKind::SetupPy | ManifestKind::PomXml | ManifestKind::BuildGradle => Vec::new(),
    };
    debug!(path = %manifest.path, count = names.len(), "parsed manifest");
    names
}

// The package name is everything before the first version or extras marker
fn requirement_name(spec: &str) -> Option<String> {
    static SPLIT: OnceLock<Regex> = OnceLock::new();
    let split = SPLIT.get_or_init(|| Regex::new(r"[<>=!~;\[@\s]").expect("static regex"));
    let name = split.split(spec.trim()).next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        // Skip comments and pip options like -r other.txt or -e .
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(requirement_name)
        .collect()
}

fn parse_json_keys(content: &str, fields: &[&str]) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(content) else {
        return Vec::new();
    };
    fields
        .iter()
        .filter_map(|field| value.get(field).and_then(|v| v.as_object()))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

fn parse_cargo(content: &str) -> Vec<String> {
    let Ok(value) = content.parse::<toml::Table>() else {
        return Vec::new();
    };
    let mut names = Vec::new();
    if let Some(deps) = value.get("dependencies").and_then(|v| v.as_table()) {
        names.extend(deps.keys().cloned());
    }
    if let Some(deps) = value
        .get("workspace")
        .and_then(|w| w.get("dependencies"))
        .and_then(|v| v.as_table())
    {
        names.extend(deps.keys().cloned());
    }
    names
}

fn parse_pyproject(content: &str) -> Vec<String> {
    let Ok(value) = content.parse::<toml::Table>() else {
        return Vec::new();
    };
    let mut names = Vec::new();

    // PEP 621
    if let Some(deps) = value
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    {
        names.extend(deps.iter().filter_map(|d| d.as_str()).filter_map(requirement_name));
    }

    // Poetry
    if let Some(deps) = value
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_table())
    {
        names.extend(deps.keys().filter(|k| k.as_str() != "python").cloned());
    }

    names
}

fn parse_go_mod(content: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_block = false;

    for line in content.lines().map(str::trim) {
        if in_block {
            if line.starts_with(')') {
                in_block = false;
            } else if let Some(module) = line.split_whitespace().next() {
                if !module.starts_with("//") {
                    names.push(module.to_string());
                }
            }
        } else if line.starts_with("require (") || line == "require(" {
            in_block = true;
        } else if let Some(rest) = line.strip_prefix("require ") {
            if let Some(module) = rest.split_whitespace().next() {
                names.push(module.to_string());
            }
        }
    }

    names
}

fn parse_gemfile(content: &str) -> Vec<String> {
    static GEM: OnceLock<Regex> = OnceLock::new();
    let gem = GEM.get_or_init(|| Regex::new(r#"^\s*gem\s+["']([^"']+)["']"#).expect("static regex"));
    content
        .lines()
        .filter_map(|line| gem.captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(kind: ManifestKind, content: &str) -> Manifest {
        Manifest {
            path: "x".to_string(),
            kind,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_requirements() {
        let text = "# web\nfastapi==0.110\nuvicorn[standard]>=0.29\n-r dev.txt\n\nrequests ; python_version>'3'\n";
        assert_eq!(
            parse(&manifest(ManifestKind::Requirements, text)),
            vec!["fastapi", "uvicorn", "requests"]
        );
    }

    #[test]
    fn test_package_json() {
        let text = r#"{"dependencies": {"react": "^18"}, "devDependencies": {"vite": "^5"}}"#;
        assert_eq!(
            parse(&manifest(ManifestKind::PackageJson, text)),
            vec!["react", "vite"]
        );
    }

    #[test]
    fn test_malformed_package_json_is_skipped() {
        assert!(parse(&manifest(ManifestKind::PackageJson, "{not json")).is_empty());
    }

    #[test]
    fn test_cargo_toml() {
        let text = "[package]\nname = \"x\"\n\n[dependencies]\nserde = \"1\"\ntokio = { version = \"1\" }\n";
        assert_eq!(
            parse(&manifest(ManifestKind::CargoToml, text)),
            vec!["serde", "tokio"]
        );
    }

    #[test]
    fn test_pyproject_pep621() {
        let text = "[project]\nname = \"x\"\ndependencies = [\"httpx>=0.27\", \"rich\"]\n";
        assert_eq!(
            parse(&manifest(ManifestKind::PyProject, text)),
            vec!["httpx", "rich"]
        );
    }

    #[test]
    fn test_go_mod() {
        let text = "module example.com/x\n\ngo 1.22\n\nrequire (\n\tgithub.com/spf13/cobra v1.8.0\n\tgolang.org/x/sync v0.7.0 // indirect\n)\nrequire github.com/pkg/errors v0.9.1\n";
        assert_eq!(
            parse(&manifest(ManifestKind::GoMod, text)),
            vec!["github.com/spf13/cobra", "golang.org/x/sync", "github.com/pkg/errors"]
        );
    }

    #[test]
    fn test_gemfile() {
        let text = "source 'https://rubygems.org'\ngem 'rails', '~> 7.1'\ngem \"puma\"\n";
        assert_eq!(parse(&manifest(ManifestKind::Gemfile, text)), vec!["rails", "puma"]);
    }

    #[test]
    fn test_collect_merges_python_manifests() {
        let manifests = vec![
            manifest(ManifestKind::Requirements, "flask\nrequests\n"),
            manifest(ManifestKind::PyProject, "[project]\ndependencies = [\"requests\", \"click\"]\n"),
        ];
        let grouped = collect(&manifests);
        assert_eq!(grouped["Python"], vec!["flask", "requests", "click"]);
    }
}
