// src/analyzer/languages.rs
// =============================================================================
// Language detection by file extension.
//
// The GitHub API already reports a primary language for most repositories;
// counting extensions is the fallback for when it does not, and feeds the
// per-language file counts shown in the Technology Stack section.
// =============================================================================

use std::collections::BTreeMap;

use crate::github::RepoFile;

/// Maps a path to a language name using its extension.
pub fn language_for_path(path: &str) -> Option<&'static str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = file_name.rsplit_once('.')?;

    let language = match ext.to_ascii_lowercase().as_str() {
        "py" => "Python",
        "js" | "jsx" | "mjs" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "java" => "Java",
        "cpp" | "cc" | "hpp" => "C++",
        "c" | "h" => "C",
        "cs" => "C#",
        "go" => "Go",
        "rs" => "Rust",
        "php" => "PHP",
        "rb" => "Ruby",
        "swift" => "Swift",
        "kt" => "Kotlin",
        "scala" => "Scala",
        "html" => "HTML",
        "css" => "CSS",
        "scss" => "SCSS",
        "sass" => "Sass",
        _ => return None,
    };
    Some(language)
}

/// Number of files per language.
pub fn count_languages(files: &[RepoFile]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for file in files {
        if let Some(lang) = language_for_path(&file.path) {
            *counts.entry(lang.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// The language with the most files. Ties go to the alphabetically first name.
pub fn primary_language(files: &[RepoFile]) -> Option<String> {
    count_languages(files)
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(lang, _)| lang)
}
