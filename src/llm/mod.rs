// src/llm/mod.rs
// =============================================================================
// Text-generation backends.
//
// The synthesizer only needs "prompt in, text out", so that is all the trait
// asks for. Prompt format, model choice and transport belong to the backend.
// =============================================================================

mod openai;

pub use openai::{OpenAiGenerator, DEFAULT_LLM_URL, DEFAULT_MODEL};

use async_trait::async_trait;
use thiserror::Error;

/// Why a backend could not produce text.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport failure, timeout, or a non-success status.
    #[error("text generation backend unavailable: {0}")]
    Unavailable(String),

    #[error("text generation backend rate limited the request")]
    RateLimited,

    /// The backend answered but we could not find any text in the answer.
    #[error("malformed response from text generation backend: {0}")]
    Malformed(String),
}

/// A backend that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Name used in logs, e.g. "openai".
    fn name(&self) -> &str;

    /// Generates text for `prompt`. `system` is an optional instruction
    /// that frames every prompt.
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String, GenerationError>;
}
