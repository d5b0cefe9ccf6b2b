// src/analyzer/frameworks.rs
// =============================================================================
// Framework detection.
//
// Two signals are combined:
// - source patterns (imports, characteristic calls) matched with regexes
// - dependency names read from manifests
//
// Documentation files are not scanned: a README that mentions React does not
// make a project a React project.
// =============================================================================

use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use crate::github::RepoFile;

/// Files above this size are not scanned.
const MAX_SCAN_BYTES: usize = 50_000;

const SKIP_EXTENSIONS: &[&str] = &["md", "rst", "txt", "lock", "json", "toml", "yml", "yaml"];

const PATTERNS: &[(&str, &[&str])] = &[
    ("FastAPI", &[r"from\s+fastapi\s+import", r"import\s+fastapi", r"FastAPI\s*\(", r"uvicorn\.run"]),
    ("Django", &[r"from\s+django", r"import\s+django", r"DJANGO_SETTINGS_MODULE"]),
    ("Flask", &[r"from\s+flask\s+import", r"import\s+flask", r"Flask\s*\(", r"@app\.route"]),
    ("Streamlit", &[r"import\s+streamlit", r"\bst\.(title|write|button|sidebar)"]),
    ("LangChain", &[r"from\s+langchain", r"import\s+langchain", r"LLMChain", r"PromptTemplate"]),
    ("Gradio", &[r"import\s+gradio", r"gradio\.Interface", r"\bgr\.(Interface|Blocks)"]),
    ("React", &[r#"from\s+["']react["']"#, r#"require\(["']react["']\)"#, r"\buseState\b", r"\buseEffect\b"]),
    ("Vue.js", &[r#"from\s+["']vue["']"#, r"\bcreateApp\s*\("]),
    ("Angular", &[r"@angular/", r"@Component\s*\(", r"@Injectable\s*\("]),
    ("Express.js", &[r#"require\(["']express["']\)"#, r#"from\s+["']express["']"#, r"\bexpress\(\)"]),
    ("Next.js", &[r#"from\s+["']next/"#, r"\bgetStaticProps\b", r"\bgetServerSideProps\b"]),
    ("TensorFlow", &[r"import\s+tensorflow", r"from\s+tensorflow", r"\bkeras\."]),
    ("PyTorch", &[r"import\s+torch", r"from\s+torch", r"nn\.Module"]),
    ("Pandas", &[r"import\s+pandas", r"from\s+pandas", r"\bpd\.DataFrame"]),
    ("NumPy", &[r"import\s+numpy", r"from\s+numpy", r"\bnp\.(array|zeros|ones)"]),
];

/// Dependency names that imply a framework.
const DEPENDENCY_HINTS: &[(&str, &str)] = &[
    ("fastapi", "FastAPI"),
    ("django", "Django"),
    ("flask", "Flask"),
    ("streamlit", "Streamlit"),
    ("langchain", "LangChain"),
    ("gradio", "Gradio"),
    ("react", "React"),
    ("vue", "Vue.js"),
    ("@angular/core", "Angular"),
    ("express", "Express.js"),
    ("next", "Next.js"),
    ("tensorflow", "TensorFlow"),
    ("torch", "PyTorch"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
];

fn compiled() -> &'static [(&'static str, Vec<Regex>)] {
    static COMPILED: OnceLock<Vec<(&'static str, Vec<Regex>)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(name, patterns)| {
                let regexes = patterns
                    .iter()
                    .filter_map(|p| {
                        RegexBuilder::new(p)
                            .case_insensitive(true)
                            .multi_line(true)
                            .build()
                            .ok()
                    })
                    .collect();
                (*name, regexes)
            })
            .collect()
    })
}

/// Detects frameworks from file contents and parsed dependencies.
///
/// The result is sorted and free of duplicates.
pub fn detect(files: &[RepoFile], dependencies: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    let mut found = BTreeSet::new();

    for file in files.iter().filter(|f| is_scannable(f)) {
        for (name, regexes) in compiled() {
            if found.contains(*name) {
                continue;
            }
            if regexes.iter().any(|re| re.is_match(&file.content)) {
                found.insert(name.to_string());
            }
        }
    }

    for dep in dependencies.values().flatten() {
        let dep = dep.to_lowercase();
        for (hint, name) in DEPENDENCY_HINTS {
            if dep == *hint {
                found.insert(name.to_string());
            }
        }
    }

    found.into_iter().collect()
}

fn is_scannable(file: &RepoFile) -> bool {
    if file.content.is_empty() || file.content.len() >= MAX_SCAN_BYTES {
        return false;
    }
    match file.file_name().rsplit_once('.') {
        Some((_, ext)) => !SKIP_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => true,
    }
}
