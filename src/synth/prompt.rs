// src/synth/prompt.rs
// =============================================================================
// Prompt construction for generated sections.
//
// Each prompt carries the repository facts, the tech stack summary and the
// contents of a few key files, followed by instructions for one section.
// File excerpts are bounded so the prompt stays well inside model context
// limits.
// =============================================================================

use std::fmt::Write as _;

use super::templates;
use crate::analyzer::ProjectAnalysis;
use crate::github::{RepoFile, RepositoryDescriptor};
use crate::sections::Section;

pub const SYSTEM_PROMPT: &str = "You are a technical writer specializing in creating excellent \
README files for software projects.";

/// Files included in the context, at most.
const MAX_CONTEXT_FILES: usize = 6;
/// Files larger than this are never included.
const MAX_CONTEXT_FILE_BYTES: u64 = 15_000;
/// Characters kept from each included file.
const EXCERPT_CHARS: usize = 2_000;

const PRIORITY_FILES: &[&str] = &["app.py", "main.py", "requirements.txt", "package.json", "setup.py"];
const SOURCE_EXTENSIONS: &[&str] = &[".py", ".js", ".ts", ".rs", ".go"];

/// Builds the user prompt for one section.
pub fn section_prompt(
    section: Section,
    descriptor: &RepositoryDescriptor,
    analysis: &ProjectAnalysis,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("Repository Information:\n");
    let _ = writeln!(prompt, "- Name: {}", descriptor.full_name());
    if let Some(description) = &descriptor.description {
        let _ = writeln!(prompt, "- Description: {}", description);
    }
    if !descriptor.topics.is_empty() {
        let _ = writeln!(prompt, "- Topics: {}", descriptor.topics.join(", "));
    }
    if let Some(homepage) = &descriptor.homepage {
        let _ = writeln!(prompt, "- Homepage: {}", homepage);
    }

    prompt.push_str("\nTechnology Stack Details:\n");
    prompt.push_str(&templates::technology_stack(descriptor, analysis));
    prompt.push_str("\n\n");

    let context = key_files_context(descriptor);
    if !context.is_empty() {
        prompt.push_str("Key Files Content:\n");
        prompt.push_str(&context);
        prompt.push('\n');
    }

    let _ = writeln!(prompt, "Write the \"{}\" section of the README.", section.heading());
    prompt.push_str(instructions(section));
    prompt.push('\n');

    for hint in framework_hints(section, analysis) {
        let _ = writeln!(prompt, "- {}", hint);
    }

    prompt.push_str(
        "\nUse proper Markdown formatting. Return only the body of the section, \
         without the section heading and without any additional explanations.",
    );
    prompt
}

fn instructions(section: Section) -> &'static str {
    match section {
        Section::Title => "Give the project's name only.",
        Section::Description => {
            "Write a clear, concise overview of what the project does in two to four sentences."
        }
        Section::Features => {
            "List the key functionality as a Markdown bullet list, inferred from the code \
             structure and frameworks."
        }
        Section::TechnologyStack => "List the languages, frameworks and tools used.",
        Section::Installation => "Give a step-by-step setup guide based on the detected dependencies.",
        Section::Usage => {
            "Explain how to run and use the project, with code examples based on the main \
             application files. Make it beginner-friendly."
        }
        Section::ProjectStructure => "Explain the important directories and files.",
        Section::Contributing => "Describe how others can contribute.",
        Section::License => "State the license information.",
    }
}

fn framework_hints(section: Section, analysis: &ProjectAnalysis) -> Vec<&'static str> {
    let mut hints = Vec::new();
    match section {
        Section::Usage => {
            if analysis.has_framework("Streamlit") {
                hints.push("Include the `streamlit run app.py` command.");
            }
            if analysis.has_framework("FastAPI") {
                hints.push("Include `uvicorn` run commands and describe the API endpoints.");
            }
            if analysis.has_framework("Flask") || analysis.has_framework("Django") {
                hints.push("Explain how to run the development server.");
            }
        }
        Section::Features | Section::Description => {
            if analysis.has_framework("LangChain") {
                hints.push("Mention the AI/NLP capabilities.");
            }
        }
        _ => {}
    }
    hints
}

/// Excerpts of the most informative files.
///
/// Priority files come first, then dependency manifests, then source files.
pub fn key_files_context(descriptor: &RepositoryDescriptor) -> String {
    let mut chosen: Vec<&RepoFile> = Vec::new();

    for file in &descriptor.files {
        if PRIORITY_FILES.contains(&file.file_name()) {
            choose(file, &mut chosen);
        }
    }
    for manifest in &descriptor.manifests {
        if let Some(file) = descriptor.file(&manifest.path) {
            choose(file, &mut chosen);
        }
    }
    for file in &descriptor.files {
        if SOURCE_EXTENSIONS.iter().any(|ext| file.path.ends_with(ext)) {
            choose(file, &mut chosen);
        }
    }

    let mut context = String::new();
    for file in chosen {
        let _ = writeln!(context, "=== {} ===\n{}\n", file.path, excerpt(&file.content));
    }
    context
}

fn choose<'a>(file: &'a RepoFile, chosen: &mut Vec<&'a RepoFile>) {
    if chosen.len() < MAX_CONTEXT_FILES
        && file.size <= MAX_CONTEXT_FILE_BYTES
        && !file.content.is_empty()
        && !chosen.iter().any(|c| c.path == file.path)
    {
        chosen.push(file);
    }
}

fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
