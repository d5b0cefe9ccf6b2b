// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - generate: build a README for a repository
// - preview:  show what was detected, without generating anything
// - sections: list the section names the customization flags understand
//
// Connection settings are global flags that fall back to environment
// variables, so tokens never have to appear on the command line.
// =============================================================================

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use readme_forge::config::{
    Settings, ENV_GITHUB_API, ENV_GITHUB_TOKEN, ENV_LLM_URL, ENV_MODEL, ENV_OPENAI_API_KEY,
};
use readme_forge::github::DEFAULT_API_URL;
use readme_forge::llm::{DEFAULT_LLM_URL, DEFAULT_MODEL};

#[derive(Parser, Debug)]
#[command(
    name = "readme-forge",
    version,
    about = "Generate README files for GitHub repositories",
    long_about = "readme-forge fetches a GitHub repository's metadata, files and dependency \
                  manifests, and writes a README from them. Prose sections are generated by an \
                  OpenAI-compatible backend when OPENAI_API_KEY is set, and from templates otherwise."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Settings shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// GitHub token used for API requests
    #[arg(long, global = true, env = ENV_GITHUB_TOKEN, hide_env_values = true)]
    pub github_token: Option<String>,

    /// API key for the text generation backend
    #[arg(long, global = true, env = ENV_OPENAI_API_KEY, hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true, env = ENV_GITHUB_API, default_value = DEFAULT_API_URL)]
    pub github_api: String,

    /// Base URL of the OpenAI-compatible backend
    #[arg(long, global = true, env = ENV_LLM_URL, default_value = DEFAULT_LLM_URL)]
    pub llm_url: String,

    /// Model name sent to the backend
    #[arg(long, global = true, env = ENV_MODEL, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Timeout in seconds for each GitHub request
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Timeout in seconds for each text generation request
    #[arg(long, global = true, default_value_t = 120)]
    pub llm_timeout: u64,

    /// Maximum number of files to download from the repository
    #[arg(long, global = true, default_value_t = 50)]
    pub max_files: usize,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

impl GlobalArgs {
    pub fn settings(&self, template_only: bool, strict: bool) -> Settings {
        Settings {
            github_api_url: self.github_api.clone(),
            github_token: self.github_token.clone(),
            openai_api_key: self.openai_api_key.clone(),
            llm_url: self.llm_url.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout,
            llm_timeout_secs: self.llm_timeout,
            max_files: self.max_files,
            template_only,
            strict,
            ..Settings::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a README for a GitHub repository
    ///
    /// Example: readme-forge generate rust-lang/rustlings --order Usage,Installation
    Generate {
        /// Repository URL or owner/name (e.g., https://github.com/user/repo)
        repo: String,

        /// Only include these sections (comma separated or repeated)
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,

        /// Put these sections first, in this order
        #[arg(long, value_delimiter = ',')]
        order: Vec<String>,

        /// Replace a section's text: --set "License=MIT, see LICENSE"
        #[arg(long = "set", value_name = "SECTION=TEXT")]
        set: Vec<String>,

        /// Replace a section's text with a file's contents
        #[arg(long = "set-file", value_name = "SECTION=PATH")]
        set_file: Vec<String>,

        /// JSON options file (include_sections, section_order, overrides)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Write the README here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Never call the text generation backend
        #[arg(long)]
        template_only: bool,

        /// Fail instead of falling back to templates when generation fails
        #[arg(long, conflicts_with = "template_only")]
        strict: bool,
    },

    /// Show the detected languages, frameworks and dependencies
    Preview {
        /// Repository URL or owner/name
        repo: String,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the section names accepted by --include, --order and --set
    Sections,
}

/// Splits "Name=value" at the first '='.
pub fn split_assignment(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected SECTION=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("missing section name in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}
