// src/error.rs
// =============================================================================
// Error types for the README generation pipeline.
//
// The library reports failures as a typed enum so callers can tell
// "repository not found" apart from "backend unavailable". The binary wraps
// these in anyhow for printing, and picks an exit code by downcasting.
//
// Rust concepts:
// - thiserror: derive Display/Error impls from attributes
// - Enums with data: each failure kind carries its own details
// =============================================================================

use thiserror::Error;

use crate::sections::Section;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Everything that can go wrong while generating a README.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The identifier could not be understood as a GitHub repository.
    #[error("invalid repository identifier '{0}': expected owner/name or a github.com URL")]
    InvalidIdentifier(String),

    /// The repository does not exist or the token cannot see it.
    #[error("repository not found or inaccessible: {repository}")]
    NotFound { repository: String },

    /// The hosting API throttled us.
    #[error("GitHub API rate limit exceeded{}", reset_hint(.reset_at))]
    RateLimit {
        /// Unix timestamp from `x-ratelimit-reset`, if the API sent one.
        reset_at: Option<u64>,
    },

    /// Transport failure, timeout, 5xx, or an undecodable response.
    #[error("network error: {0}")]
    Network(String),

    /// The settings cannot work (bad API URL, HTTP client setup).
    #[error("configuration error: {0}")]
    Config(String),

    /// The text-generation backend failed and no fallback was allowed.
    #[error("could not synthesize the {section} section: {reason}")]
    Synthesis { section: Section, reason: String },
}

fn reset_hint(reset_at: &Option<u64>) -> String {
    match reset_at {
        Some(ts) => format!(" (resets at unix time {})", ts),
        None => String::new(),
    }
}

impl ForgeError {
    /// True for errors about the repository or the backend, as opposed to
    /// errors in our own settings.
    pub fn is_classified(&self) -> bool {
        !matches!(self, ForgeError::Config(_))
    }

    /// Short machine-friendly name, used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            ForgeError::InvalidIdentifier(_) => "invalid_identifier",
            ForgeError::NotFound { .. } => "not_found",
            ForgeError::RateLimit { .. } => "rate_limit",
            ForgeError::Network(_) => "network",
            ForgeError::Config(_) => "config",
            ForgeError::Synthesis { .. } => "synthesis",
        }
    }
}

impl From<reqwest::Error> for ForgeError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ForgeError::Network(format!("request timed out: {}", error))
        } else if error.is_decode() {
            ForgeError::Network(format!("could not decode response: {}", error))
        } else {
            ForgeError::Network(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_message_includes_reset() {
        let err = ForgeError::RateLimit { reset_at: Some(1700000000) };
        assert!(err.to_string().contains("1700000000"));

        let err = ForgeError::RateLimit { reset_at: None };
        assert_eq!(err.to_string(), "GitHub API rate limit exceeded");
    }

    #[test]
    fn test_synthesis_message_names_section() {
        let err = ForgeError::Synthesis {
            section: Section::Features,
            reason: "backend down".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not synthesize the Features section: backend down"
        );
        assert_eq!(err.kind(), "synthesis");
    }

    #[test]
    fn test_config_errors_are_not_classified() {
        let err = ForgeError::Config("bad URL".to_string());
        assert_eq!(err.kind(), "config");
        assert!(!err.is_classified());
        assert!(ForgeError::Network("reset".to_string()).is_classified());
    }
}
