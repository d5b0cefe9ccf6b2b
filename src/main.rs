// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr so stdout stays clean)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = repository/backend error, 2 = other error)
//
// Rust concepts used:
// - async/await: the pipeline makes many network requests
// - anyhow::Error::downcast_ref: recover the library's typed error to pick an exit code
// - match: Pattern matching to handle different subcommands
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::{split_assignment, Cli, Commands, GlobalArgs};
use readme_forge::{CustomizationOptions, ForgeError, Preview, ReadmeForge, Section};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.global.log_level);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    };

    std::process::exit(exit_code);
}

// Repository and backend errors get 1; anything else (bad settings, bad
// flags, unreadable files, I/O) gets 2
fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ForgeError>() {
        Some(forge) => {
            debug!(kind = forge.kind(), "generation failed");
            if forge.is_classified() {
                1
            } else {
                2
            }
        }
        None => 2,
    }
}

// RUST_LOG wins over --log-level when both are given
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            repo,
            include,
            order,
            set,
            set_file,
            options,
            output,
            template_only,
            strict,
        } => {
            let options = build_options(options.as_deref(), include, order, set, set_file)?;
            let forge = build_forge(&cli.global, template_only, strict)?;

            let readme = forge.generate_readme(&repo, Some(&options)).await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, readme.as_str())
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Wrote README for {} to {}", repo, path.display());
                }
                None => print!("{}", readme),
            }
            Ok(())
        }
        Commands::Preview { repo, json } => {
            let forge = build_forge(&cli.global, true, false)?;
            let preview = forge.preview(&repo).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                print_preview(&preview);
            }
            Ok(())
        }
        Commands::Sections => {
            for section in Section::BASELINE {
                println!("{}", section.heading());
            }
            Ok(())
        }
    }
}

fn build_forge(global: &GlobalArgs, template_only: bool, strict: bool) -> Result<ReadmeForge> {
    let settings = global.settings(template_only, strict);
    let warnings = settings.validate().map_err(anyhow::Error::msg)?;
    for warning in warnings {
        warn!("{}", warning);
    }
    Ok(ReadmeForge::from_settings(&settings)?)
}

// The options file is the base layer; command-line flags are layered on top
fn build_options(
    file: Option<&Path>,
    include: Vec<String>,
    order: Vec<String>,
    set: Vec<String>,
    set_file: Vec<String>,
) -> Result<CustomizationOptions> {
    let base = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read options file {}", path.display()))?;
            CustomizationOptions::from_json(&text)
                .with_context(|| format!("invalid options file {}", path.display()))?
        }
        None => CustomizationOptions::default(),
    };

    let mut overrides = BTreeMap::new();
    for raw in &set {
        let (name, text) = split_assignment(raw)?;
        overrides.insert(name, text);
    }
    for raw in &set_file {
        let (name, path) = split_assignment(raw)?;
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read override file {}", path))?;
        overrides.insert(name, text);
    }

    let flags = CustomizationOptions {
        include_sections: if include.is_empty() { None } else { Some(include) },
        section_order: order,
        overrides,
    };
    Ok(base.merged_with(flags))
}

fn print_preview(preview: &Preview) {
    let repo = &preview.repository;
    let analysis = &preview.analysis;

    println!("📦 {}", repo.full_name());
    if let Some(description) = &repo.description {
        println!("   {}", description);
    }
    println!();

    let none = "-".to_string();
    println!("{:<20} {}", "Project type", analysis.project_type);
    println!(
        "{:<20} {}",
        "Primary language",
        analysis.primary_language.as_ref().unwrap_or(&none)
    );
    println!("{:<20} {}", "License", repo.license.as_ref().unwrap_or(&none));
    println!("{:<20} {}", "Files fetched", analysis.file_count);
    println!("{:<20} {}", "Has tests", yes_no(analysis.has_tests));
    println!("{:<20} {}", "Has docs", yes_no(analysis.has_docs));
    println!("{}", "=".repeat(60));

    if !analysis.languages.is_empty() {
        println!("Languages:");
        for (language, count) in &analysis.languages {
            println!("   {:<20} {} file(s)", language, count);
        }
    }
    if !analysis.frameworks.is_empty() {
        println!("Frameworks: {}", analysis.frameworks.join(", "));
    }
    for (ecosystem, names) in &analysis.dependencies {
        println!("Dependencies ({}): {}", ecosystem, names.join(", "));
    }
    if !analysis.config_files.is_empty() {
        println!("Config files: {}", analysis.config_files.join(", "));
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_layer_over_options_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"include_sections": ["Usage", "License"], "overrides": {{"License": "MIT"}}}}"#
        )
        .unwrap();

        let options = build_options(
            Some(file.path()),
            Vec::new(),
            vec!["License".to_string()],
            vec!["Usage=Run it.".to_string()],
            Vec::new(),
        )
        .unwrap();

        assert_eq!(
            options.include_sections,
            Some(vec!["Usage".to_string(), "License".to_string()])
        );
        assert_eq!(options.section_order, vec!["License".to_string()]);
        assert_eq!(options.overrides["License"], "MIT");
        assert_eq!(options.overrides["Usage"], "Run it.");
    }

    #[test]
    fn test_set_file_reads_override_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "See CONTRIBUTING.md").unwrap();
        let assignment = format!("Contributing={}", file.path().display());

        let options =
            build_options(None, Vec::new(), Vec::new(), Vec::new(), vec![assignment]).unwrap();
        assert_eq!(options.overrides["Contributing"], "See CONTRIBUTING.md");
        assert_eq!(options.include_sections, None);
    }

    #[test]
    fn test_exit_codes() {
        let not_found = anyhow::Error::from(ForgeError::NotFound {
            repository: "octo/demo".to_string(),
        });
        assert_eq!(exit_code_for(&not_found), 1);

        let config = anyhow::Error::from(ForgeError::Config("bad URL".to_string()));
        assert_eq!(exit_code_for(&config), 2);

        assert_eq!(exit_code_for(&anyhow::anyhow!("unreadable file")), 2);
    }

    #[test]
    fn test_bad_options_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"unknown\": 1}}").unwrap();
        let result = build_options(Some(file.path()), Vec::new(), Vec::new(), Vec::new(), Vec::new());
        assert!(result.is_err());
    }
}

// =============================================================================
// BEGINNER NOTES:
//
// 1. Why two error types?
//    The library returns ForgeError, an enum callers can match on. The binary
//    uses anyhow so it can mix library errors with file and flag errors and
//    attach context. `downcast_ref` recovers the library error when needed.
//
// 2. Why log to stderr?
//    `readme-forge generate owner/repo > README.md` must produce a clean
//    file, so only the README itself goes to stdout.
// =============================================================================
