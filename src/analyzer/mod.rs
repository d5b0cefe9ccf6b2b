// src/analyzer/mod.rs
// =============================================================================
// Project analysis: what a repository is built with and what kind of project
// it is. Everything here is a pure function of the RepositoryDescriptor.
//
// Submodules:
// - languages: extension based language counts
// - frameworks: regex and dependency based framework detection
// - dependencies: manifest parsing
// =============================================================================

pub mod dependencies;
pub mod frameworks;
pub mod languages;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::github::{RepoFile, RepositoryDescriptor};

const CONFIG_FILES: &[&str] = &[
    ".env.example",
    "config.yaml",
    "config.json",
    "docker-compose.yml",
    "Dockerfile",
    "tsconfig.json",
    "webpack.config.js",
];

/// Broad category of a project, used to pick usage instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    WebApplication,
    GuiApplication,
    MachineLearning,
    DataAnalysis,
    PythonApplication,
    JavaScriptApplication,
    RustApplication,
    GoApplication,
    Unknown,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectType::WebApplication => "Web Application",
            ProjectType::GuiApplication => "GUI Application",
            ProjectType::MachineLearning => "Machine Learning",
            ProjectType::DataAnalysis => "Data Analysis",
            ProjectType::PythonApplication => "Python Application",
            ProjectType::JavaScriptApplication => "JavaScript Application",
            ProjectType::RustApplication => "Rust Application",
            ProjectType::GoApplication => "Go Application",
            ProjectType::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Summary of what the fetched files tell us.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectAnalysis {
    /// File count per language.
    pub languages: BTreeMap<String, usize>,
    pub primary_language: Option<String>,
    pub frameworks: Vec<String>,
    /// Dependency names per ecosystem.
    pub dependencies: BTreeMap<String, Vec<String>>,
    pub project_type: ProjectType,
    pub config_files: Vec<String>,
    pub has_tests: bool,
    pub has_docs: bool,
    pub file_count: usize,
}

impl ProjectAnalysis {
    pub fn has_framework(&self, name: &str) -> bool {
        self.frameworks.iter().any(|f| f == name)
    }
}

/// Analyzes a fetched repository.
pub fn analyze(descriptor: &RepositoryDescriptor) -> ProjectAnalysis {
    let files = &descriptor.files;
    let dependencies = dependencies::collect(&descriptor.manifests);
    let frameworks = frameworks::detect(files, &dependencies);
    let primary_language = descriptor
        .primary_language
        .clone()
        .or_else(|| languages::primary_language(files));
    let project_type = project_type(&frameworks, primary_language.as_deref());

    ProjectAnalysis {
        languages: languages::count_languages(files),
        primary_language,
        frameworks,
        dependencies,
        project_type,
        config_files: config_files(files),
        has_tests: files.iter().any(|f| is_test_path(&f.path)),
        has_docs: files.iter().any(|f| is_doc_path(&f.path))
            || descriptor.top_level.iter().any(|e| is_doc_path(&e.path)),
        file_count: files.len(),
    }
}

fn project_type(frameworks: &[String], primary_language: Option<&str>) -> ProjectType {
    let any = |names: &[&str]| frameworks.iter().any(|f| names.contains(&f.as_str()));

    if any(&["FastAPI", "Django", "Flask", "Express.js", "React", "Vue.js", "Angular", "Next.js"]) {
        return ProjectType::WebApplication;
    }
    if any(&["Streamlit", "Gradio"]) {
        return ProjectType::GuiApplication;
    }
    if any(&["TensorFlow", "PyTorch", "LangChain"]) {
        return ProjectType::MachineLearning;
    }

    let language = primary_language.unwrap_or("").to_ascii_lowercase();
    if any(&["Pandas", "NumPy"]) && language == "python" {
        return ProjectType::DataAnalysis;
    }

    match language.as_str() {
        "python" => ProjectType::PythonApplication,
        "javascript" | "typescript" => ProjectType::JavaScriptApplication,
        "rust" => ProjectType::RustApplication,
        "go" => ProjectType::GoApplication,
        _ => ProjectType::Unknown,
    }
}

fn config_files(files: &[RepoFile]) -> Vec<String> {
    files
        .iter()
        .filter(|f| CONFIG_FILES.contains(&f.file_name()))
        .map(|f| f.path.clone())
        .collect()
}

fn is_test_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.contains("test") || lower.contains("spec")
}

fn is_doc_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    ["readme", "doc", "wiki"].iter().any(|d| lower.contains(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_type_prefers_web_frameworks() {
        let frameworks = vec!["Pandas".to_string(), "Flask".to_string()];
        assert_eq!(
            project_type(&frameworks, Some("Python")),
            ProjectType::WebApplication
        );
    }

    #[test]
    fn test_project_type_data_analysis_needs_python() {
        let frameworks = vec!["NumPy".to_string()];
        assert_eq!(project_type(&frameworks, Some("Python")), ProjectType::DataAnalysis);
        assert_eq!(project_type(&frameworks, Some("Rust")), ProjectType::RustApplication);
    }

    #[test]
    fn test_project_type_unknown_without_signals() {
        assert_eq!(project_type(&[], None), ProjectType::Unknown);
        assert_eq!(ProjectType::GuiApplication.to_string(), "GUI Application");
    }

    #[test]
    fn test_path_classifiers() {
        assert!(is_test_path("tests/test_app.py"));
        assert!(is_test_path("src/App.spec.ts"));
        assert!(!is_test_path("src/app.py"));
        assert!(is_doc_path("docs/guide.md"));
        assert!(is_doc_path("README.md"));
    }
}
