// src/llm/openai.rs
// =============================================================================
// OpenAI-compatible chat completions backend.
//
// Works with anything that speaks POST {base}/chat/completions: OpenAI
// itself, Azure deployments, vLLM, llama.cpp's server, etc.
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::{GenerationError, TextGenerator};

pub const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Chat completions client.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 800,
        })
    }

    /// Use a custom base URL (Azure, vLLM, a local server, ...)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String, GenerationError> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": prompt }));

        let body = serde_json::json!({
            "model": &self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        debug!(model = %self.model, prompt_chars = prompt.len(), "chat completion request");

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Unavailable(format!("HTTP {status}: {text}")));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        extract_content(&data)
    }
}

fn extract_content(data: &serde_json::Value) -> Result<String, GenerationError> {
    let content = data["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .unwrap_or("");

    if content.is_empty() {
        return Err(GenerationError::Malformed(
            "response has no message content".to_string(),
        ));
    }
    Ok(content.to_string())
}
