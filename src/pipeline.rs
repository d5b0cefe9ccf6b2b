// src/pipeline.rs
// =============================================================================
// The public entry point: fetch -> synthesize -> assemble.
//
// Each run is independent. Nothing is cached between calls, so one
// ReadmeForge can serve many repositories, sequentially or from parallel
// tasks.
// =============================================================================

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::analyzer::{self, ProjectAnalysis};
use crate::assemble::{assemble, CustomizationOptions, GeneratedReadme};
use crate::config::Settings;
use crate::error::{ForgeError, Result};
use crate::github::{FetchLimits, Fetcher, GitHubClient, RepositoryDescriptor};
use crate::llm::OpenAiGenerator;
use crate::synth::Synthesizer;

/// Fetched data plus its analysis, without generating anything.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub repository: RepositoryDescriptor,
    pub analysis: ProjectAnalysis,
}

/// Generates READMEs for GitHub repositories.
#[derive(Clone)]
pub struct ReadmeForge {
    fetcher: Fetcher,
    synthesizer: Synthesizer,
}

impl ReadmeForge {
    pub fn new(fetcher: Fetcher, synthesizer: Synthesizer) -> Self {
        Self {
            fetcher,
            synthesizer,
        }
    }

    /// Wires up the GitHub client and, when an API key is configured and
    /// templates were not forced, the text-generation backend.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = GitHubClient::new(
            &settings.github_api_url,
            settings.github_token.clone(),
            Duration::from_secs(settings.timeout_secs),
        )?;
        let limits = FetchLimits {
            max_files: settings.max_files,
            max_file_bytes: settings.max_file_bytes,
        };
        let fetcher = Fetcher::new(client, limits);

        let synthesizer = match (&settings.openai_api_key, settings.template_only) {
            (Some(key), false) => {
                let generator = OpenAiGenerator::new(
                    key.clone(),
                    Duration::from_secs(settings.llm_timeout_secs),
                )
                .map_err(|e| ForgeError::Config(e.to_string()))?
                .with_base_url(settings.llm_url.clone())
                .with_model(settings.model.clone());
                Synthesizer::with_generator(Arc::new(generator))
            }
            _ => Synthesizer::templates_only(),
        }
        .strict(settings.strict);

        Ok(Self::new(fetcher, synthesizer))
    }

    /// Generates a README for `identifier`.
    ///
    /// Fetcher and synthesizer errors are returned unchanged; assembly
    /// cannot fail.
    #[instrument(skip(self, options))]
    pub async fn generate_readme(
        &self,
        identifier: &str,
        options: Option<&CustomizationOptions>,
    ) -> Result<GeneratedReadme> {
        let descriptor = self.fetcher.fetch(identifier).await?;
        let sections = self.synthesizer.synthesize(&descriptor).await?;

        let default_options = CustomizationOptions::default();
        let readme = assemble(&sections, options.unwrap_or(&default_options));
        info!(bytes = readme.as_str().len(), "README assembled");
        Ok(readme)
    }

    /// Fetches and analyzes `identifier` without synthesizing anything.
    pub async fn preview(&self, identifier: &str) -> Result<Preview> {
        let repository = self.fetcher.fetch(identifier).await?;
        let analysis = analyzer::analyze(&repository);
        Ok(Preview {
            repository,
            analysis,
        })
    }
}
