// src/lib.rs
// =============================================================================
// readme-forge: generates README files for GitHub repositories.
//
// The pipeline has three steps, composed in this order:
// 1. github::Fetcher        repository identifier -> RepositoryDescriptor
// 2. synth::Synthesizer     RepositoryDescriptor  -> SectionSet
// 3. assemble::assemble     SectionSet + options  -> GeneratedReadme
//
// pipeline::ReadmeForge wires them together behind `generate_readme`.
// =============================================================================

pub mod analyzer;
pub mod assemble;
pub mod config;
pub mod error;
pub mod github;
pub mod llm;
pub mod pipeline;
pub mod sections;
pub mod synth;

pub use assemble::{assemble, CustomizationOptions, GeneratedReadme};
pub use config::Settings;
pub use error::{ForgeError, Result};
pub use github::{Fetcher, RepositoryDescriptor};
pub use pipeline::{Preview, ReadmeForge};
pub use sections::{Section, SectionSet};
pub use synth::Synthesizer;

/// Generates a README for `identifier` with settings from the environment.
///
/// Convenience wrapper around [`ReadmeForge::generate_readme`].
pub async fn generate_readme(
    identifier: &str,
    options: Option<&CustomizationOptions>,
) -> Result<GeneratedReadme> {
    ReadmeForge::from_settings(&Settings::from_env())?
        .generate_readme(identifier, options)
        .await
}
