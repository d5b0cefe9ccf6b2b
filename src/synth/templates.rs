// src/synth/templates.rs
// =============================================================================
// Deterministic section text.
//
// Every section has a template, so a README can always be produced without a
// text-generation backend. Templates read only the descriptor and its
// analysis; same input, same output.
// =============================================================================

use std::fmt::Write as _;

use crate::analyzer::ProjectAnalysis;
use crate::analyzer::ProjectType;
use crate::github::{EntryKind, ManifestKind, RepositoryDescriptor};

/// Dependencies listed per ecosystem before "and N more".
const MAX_LISTED_DEPENDENCIES: usize = 10;

pub fn title(descriptor: &RepositoryDescriptor) -> String {
    descriptor.name.clone()
}

pub fn description(descriptor: &RepositoryDescriptor, analysis: &ProjectAnalysis) -> String {
    if let Some(description) = &descriptor.description {
        return description.trim().to_string();
    }

    let kind = match analysis.project_type {
        ProjectType::Unknown => "software project".to_string(),
        other => other.to_string().to_lowercase(),
    };
    let article = if starts_with_vowel(&kind) { "an" } else { "a" };
    let mut text = format!("`{}` is {} {}", descriptor.name, article, kind);
    if let Some(lang) = &analysis.primary_language {
        let _ = write!(text, " written in {}", lang);
    }
    text.push('.');

    if !descriptor.topics.is_empty() {
        let _ = write!(text, " Topics: {}.", descriptor.topics.join(", "));
    }
    text
}

pub fn features(descriptor: &RepositoryDescriptor, analysis: &ProjectAnalysis) -> String {
    let mut items: Vec<String> = analysis
        .frameworks
        .iter()
        .map(|fw| framework_feature(fw))
        .collect();

    // Then capabilities we can see in the tree itself
    if analysis.has_tests {
        items.push("Automated test suite".to_string());
    }
    if descriptor.has_top_level("Dockerfile") || descriptor.has_top_level("docker-compose.yml") {
        items.push("Docker support for containerized deployment".to_string());
    }
    if analysis.config_files.iter().any(|f| f.ends_with(".env.example")) {
        items.push("Environment-based configuration".to_string());
    }
    // Never render an empty list
    if items.is_empty() {
        items.push(format!("Source code for {}", descriptor.name));
    }

    bullet_list(&items)
}

fn framework_feature(framework: &str) -> String {
    match framework {
        "Streamlit" => "Interactive web interface built with Streamlit".to_string(),
        "Gradio" => "Interactive demo interface built with Gradio".to_string(),
        "FastAPI" => "REST API powered by FastAPI".to_string(),
        "Flask" => "Web application built with Flask".to_string(),
        "Django" => "Full-stack web application built with Django".to_string(),
        "Express.js" => "HTTP server built with Express.js".to_string(),
        "LangChain" => "AI/NLP capabilities through LangChain".to_string(),
        "TensorFlow" | "PyTorch" => format!("Machine learning models with {}", framework),
        "Pandas" | "NumPy" => format!("Data processing with {}", framework),
        other => format!("Uses {}", other),
    }
}

pub fn technology_stack(descriptor: &RepositoryDescriptor, analysis: &ProjectAnalysis) -> String {
    let mut items = Vec::new();

    match &analysis.primary_language {
        Some(lang) => items.push(format!("**Primary Language:** {}", lang)),
        None => items.push("**Primary Language:** not detected".to_string()),
    }

    // Prefer our own per-file counts; fall back to GitHub's language stats
    // when no files were downloaded
    if !analysis.languages.is_empty() {
        let langs: Vec<String> = analysis
            .languages
            .iter()
            .map(|(lang, count)| format!("{} ({} {})", lang, count, plural(*count, "file")))
            .collect();
        items.push(format!("**Languages:** {}", langs.join(", ")));
    } else if !descriptor.languages.is_empty() {
        let langs: Vec<&str> = descriptor.languages.keys().map(String::as_str).collect();
        items.push(format!("**Languages:** {}", langs.join(", ")));
    }

    if !analysis.frameworks.is_empty() {
        items.push(format!(
            "**Frameworks/Libraries:** {}",
            analysis.frameworks.join(", ")
        ));
    }

    // One line per ecosystem, long lists cut short
    for (ecosystem, deps) in &analysis.dependencies {
        if deps.is_empty() {
            continue;
        }
        let shown: Vec<&str> = deps
            .iter()
            .take(MAX_LISTED_DEPENDENCIES)
            .map(String::as_str)
            .collect();
        let mut line = format!("**{} Dependencies:** {}", ecosystem, shown.join(", "));
        if deps.len() > MAX_LISTED_DEPENDENCIES {
            let _ = write!(line, ", and {} more", deps.len() - MAX_LISTED_DEPENDENCIES);
        }
        items.push(line);
    }

    if analysis.project_type != ProjectType::Unknown {
        items.push(format!("**Project Type:** {}", analysis.project_type));
    }

    bullet_list(&items)
}

pub fn installation(descriptor: &RepositoryDescriptor, analysis: &ProjectAnalysis) -> String {
    let mut text = String::new();

    // Step 1: What has to be installed first
    let prerequisites = prerequisites(descriptor);
    if !prerequisites.is_empty() {
        let _ = writeln!(text, "Prerequisites: {}.\n", prerequisites.join(", "));
    }

    // Step 2: Clone
    text.push_str("Clone the repository:\n\n```bash\n");
    let _ = writeln!(text, "git clone {}", descriptor.clone_url());
    let _ = writeln!(text, "cd {}", descriptor.name);
    text.push_str("```");

    // Step 3: One install command per manifest
    let commands = install_commands(descriptor);
    if !commands.is_empty() {
        text.push_str("\n\nInstall the dependencies:\n\n```bash\n");
        for command in &commands {
            let _ = writeln!(text, "{}", command);
        }
        text.push_str("```");
    }

    // Step 4: Local configuration, if the repo ships a template for it
    if analysis.config_files.iter().any(|f| f == ".env.example") {
        text.push_str("\n\nCreate your local configuration:\n\n```bash\ncp .env.example .env\n```");
    }

    text
}

fn prerequisites(descriptor: &RepositoryDescriptor) -> Vec<&'static str> {
    let mut needs = Vec::new();
    for manifest in &descriptor.manifests {
        let need = match manifest.kind {
            ManifestKind::Requirements | ManifestKind::PyProject | ManifestKind::SetupPy => {
                "Python 3 with pip"
            }
            ManifestKind::PackageJson => "Node.js with npm",
            ManifestKind::CargoToml => "a Rust toolchain (cargo)",
            ManifestKind::GoMod => "Go",
            ManifestKind::Gemfile => "Ruby with Bundler",
            ManifestKind::ComposerJson => "PHP with Composer",
            ManifestKind::PomXml => "a JDK with Maven",
            ManifestKind::BuildGradle => "a JDK",
        };
        if !needs.contains(&need) {
            needs.push(need);
        }
    }
    needs
}

fn install_commands(descriptor: &RepositoryDescriptor) -> Vec<String> {
    let mut commands: Vec<String> = Vec::new();

    for manifest in &descriptor.manifests {
        // Manifests in subdirectories need a cd first
        let dir = manifest
            .path
            .rsplit_once('/')
            .map(|(dir, _)| dir.to_string());

        let command = match manifest.kind {
            // pip takes the path directly, no need to cd
            ManifestKind::Requirements => {
                commands.push(format!("pip install -r {}", manifest.path));
                continue;
            }
            ManifestKind::PyProject | ManifestKind::SetupPy => "pip install .",
            ManifestKind::PackageJson => "npm install",
            ManifestKind::CargoToml => "cargo build --release",
            ManifestKind::GoMod => "go mod download",
            ManifestKind::Gemfile => "bundle install",
            ManifestKind::ComposerJson => "composer install",
            ManifestKind::PomXml => "mvn install",
            ManifestKind::BuildGradle => "./gradlew build",
        };

        let command = match dir {
            Some(dir) => format!("(cd {} && {})", dir, command),
            None => command.to_string(),
        };
        // pyproject.toml and setup.py side by side still mean one `pip install .`
        if !commands.contains(&command) {
            commands.push(command);
        }
    }

    commands
}

pub fn usage(descriptor: &RepositoryDescriptor, analysis: &ProjectAnalysis) -> String {
    let (intro, commands) = run_commands(descriptor, analysis);
    // Nothing we know how to run
    if commands.is_empty() {
        return format!(
            "See the source code and documentation in this repository for how to use {}.",
            descriptor.name
        );
    }

    let mut text = format!("{}\n\n```bash\n", intro);
    for command in &commands {
        let _ = writeln!(text, "{}", command);
    }
    text.push_str("```");

    if analysis.has_framework("FastAPI") {
        text.push_str(
            "\n\nOnce the server is running, interactive API documentation is available at \
             <http://localhost:8000/docs>.",
        );
    }
    text
}

fn run_commands(descriptor: &RepositoryDescriptor, analysis: &ProjectAnalysis) -> (String, Vec<String>) {
    // The checks below run from most to least specific: a framework beats
    // a manifest, a manifest beats a bare entry file
    let python_entry = || {
        ["app.py", "main.py"]
            .iter()
            .find(|name| descriptor.file(name).is_some())
            .map(|name| name.to_string())
    };

    if analysis.has_framework("Streamlit") {
        let entry = file_containing(descriptor, "import streamlit")
            .or_else(python_entry)
            .unwrap_or_else(|| "app.py".to_string());
        return ("Start the Streamlit app:".to_string(), vec![format!("streamlit run {}", entry)]);
    }

    if analysis.has_framework("FastAPI") {
        // uvicorn wants a module path: api/main.py -> api.main
        let module = file_containing(descriptor, "FastAPI(")
            .map(|path| path.trim_end_matches(".py").replace('/', "."))
            .unwrap_or_else(|| "main".to_string());
        return (
            "Start the API server:".to_string(),
            vec![format!("uvicorn {}:app --reload", module)],
        );
    }

    if analysis.has_framework("Django") || descriptor.file("manage.py").is_some() {
        return (
            "Start the development server:".to_string(),
            vec!["python manage.py runserver".to_string()],
        );
    }

    if analysis.has_framework("Flask") {
        let app = python_entry().unwrap_or_else(|| "app.py".to_string());
        return (
            "Start the development server:".to_string(),
            vec![format!("flask --app {} run", app.trim_end_matches(".py"))],
        );
    }

    if let Some(manifest) = descriptor.manifest(ManifestKind::PackageJson) {
        // Only suggest scripts the package actually defines
        let scripts = npm_scripts(&manifest.content);
        for (script, command) in [("dev", "npm run dev"), ("start", "npm start")] {
            if scripts.iter().any(|s| s == script) {
                return ("Run the project:".to_string(), vec![command.to_string()]);
            }
        }
    }

    if descriptor.manifest(ManifestKind::CargoToml).is_some() {
        return ("Run the project:".to_string(), vec!["cargo run --release".to_string()]);
    }

    if descriptor.manifest(ManifestKind::GoMod).is_some() {
        return ("Run the project:".to_string(), vec!["go run .".to_string()]);
    }

    if let Some(entry) = python_entry() {
        return ("Run the project:".to_string(), vec![format!("python {}", entry)]);
    }

    (String::new(), Vec::new())
}

fn file_containing(descriptor: &RepositoryDescriptor, needle: &str) -> Option<String> {
    descriptor
        .files
        .iter()
        .filter(|f| f.path.ends_with(".py"))
        .find(|f| f.content.contains(needle))
        .map(|f| f.path.clone())
}

fn npm_scripts(package_json: &str) -> Vec<String> {
    serde_json::from_str::<serde_json::Value>(package_json)
        .ok()
        .and_then(|v| v.get("scripts").and_then(|s| s.as_object()).map(|s| s.keys().cloned().collect()))
        .unwrap_or_default()
}

pub fn project_structure(descriptor: &RepositoryDescriptor) -> String {
    if descriptor.top_level.is_empty() {
        return "The repository does not contain any files yet.".to_string();
    }

    // Directories first, then files, each group in listing order
    let mut entries: Vec<String> = descriptor
        .top_level
        .iter()
        .filter(|e| e.kind == EntryKind::Dir)
        .map(|e| format!("{}/", e.path))
        .collect();
    entries.extend(
        descriptor
            .top_level
            .iter()
            .filter(|e| e.kind != EntryKind::Dir)
            .map(|e| e.path.clone()),
    );

    // Draw the tree; the last entry gets the closing branch
    let mut text = format!("```text\n{}/\n", descriptor.name);
    for (i, entry) in entries.iter().enumerate() {
        let branch = if i + 1 == entries.len() { "└──" } else { "├──" };
        let _ = writeln!(text, "{} {}", branch, entry);
    }
    text.push_str("```");
    text
}

pub fn contributing(descriptor: &RepositoryDescriptor) -> String {
    let mut text = String::from("Contributions are welcome! To contribute:\n\n");
    text.push_str("1. Fork the repository\n");
    text.push_str("2. Create a feature branch (`git checkout -b feature/my-change`)\n");
    text.push_str("3. Commit your changes (`git commit -m 'Add my change'`)\n");
    text.push_str("4. Push the branch (`git push origin feature/my-change`)\n");
    text.push_str("5. Open a pull request\n\n");
    let _ = write!(
        text,
        "Please report bugs and request features through the [issue tracker](https://github.com/{}/issues).",
        descriptor.full_name()
    );
    text
}

pub fn license(descriptor: &RepositoryDescriptor) -> String {
    let has_file = descriptor
        .top_level
        .iter()
        .any(|e| e.path.to_uppercase().starts_with("LICENSE"));

    // Link the LICENSE file when there is one at the root
    match (&descriptor.license, has_file) {
        (Some(name), true) => format!(
            "This project is licensed under the {}. See the [LICENSE](LICENSE) file for details.",
            license_phrase(name)
        ),
        (Some(name), false) => format!("This project is licensed under the {}.", license_phrase(name)),
        (None, true) => "See the [LICENSE](LICENSE) file for licensing details.".to_string(),
        (None, false) => "No license has been specified for this project yet.".to_string(),
    }
}

fn license_phrase(name: &str) -> String {
    if name.to_lowercase().contains("license") {
        name.to_string()
    } else {
        format!("{} License", name)
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

fn starts_with_vowel(word: &str) -> bool {
    word.chars()
        .next()
        .map(|c| "aeiou".contains(c.to_ascii_lowercase()))
        .unwrap_or(false)
}
