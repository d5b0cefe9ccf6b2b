// src/config.rs
// =============================================================================
// Runtime settings: where the APIs live, credentials, limits and timeouts.
//
// The CLI fills these from flags (each flag falls back to an environment
// variable). Library users can start from `Settings::from_env()` or
// `Settings::default()` and adjust fields directly.
// =============================================================================

use crate::github::DEFAULT_API_URL;
use crate::llm::{DEFAULT_LLM_URL, DEFAULT_MODEL};

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_GITHUB_API: &str = "README_FORGE_GITHUB_API";
pub const ENV_LLM_URL: &str = "README_FORGE_LLM_URL";
pub const ENV_MODEL: &str = "README_FORGE_MODEL";

#[derive(Debug, Clone)]
pub struct Settings {
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub llm_url: String,
    pub model: String,
    /// Per-request timeout for GitHub calls.
    pub timeout_secs: u64,
    /// Per-request timeout for text generation calls.
    pub llm_timeout_secs: u64,
    pub max_files: usize,
    pub max_file_bytes: u64,
    /// Never call the text-generation backend.
    pub template_only: bool,
    /// Backend failures are errors instead of falling back to templates.
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_api_url: DEFAULT_API_URL.to_string(),
            github_token: None,
            openai_api_key: None,
            llm_url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
            llm_timeout_secs: 120,
            max_files: 50,
            max_file_bytes: 100_000,
            template_only: false,
            strict: false,
        }
    }
}

impl Settings {
    /// Defaults, with credentials and endpoints taken from the environment.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            github_api_url: var(ENV_GITHUB_API).unwrap_or(defaults.github_api_url),
            github_token: var(ENV_GITHUB_TOKEN),
            openai_api_key: var(ENV_OPENAI_API_KEY),
            llm_url: var(ENV_LLM_URL).unwrap_or(defaults.llm_url),
            model: var(ENV_MODEL).unwrap_or(defaults.model),
            ..defaults
        }
    }

    /// True when prose sections will be sent to the backend.
    pub fn uses_generator(&self) -> bool {
        self.openai_api_key.is_some() && !self.template_only
    }

    /// Checks the settings. Returns warnings worth logging, or an error for
    /// settings that cannot work.
    pub fn validate(&self) -> Result<Vec<String>, String> {
        if self.max_files == 0 {
            return Err("max_files must be at least 1".to_string());
        }
        if self.timeout_secs == 0 || self.llm_timeout_secs == 0 {
            return Err("timeouts must be at least 1 second".to_string());
        }

        let mut warnings = Vec::new();
        if self.github_token.is_none() {
            warnings.push(format!(
                "{} is not set; unauthenticated GitHub requests are limited to 60 per hour",
                ENV_GITHUB_TOKEN
            ));
        }
        if self.strict && !self.uses_generator() {
            warnings.push("strict mode has no effect without a text generation backend".to_string());
        }
        Ok(warnings)
    }
}
