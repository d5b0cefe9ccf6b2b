// src/synth/mod.rs
// =============================================================================
// The content synthesizer: RepositoryDescriptor in, SectionSet out.
//
// Most sections are filled from templates because the descriptor already
// holds the facts (language, manifests, license). Description, Features and
// Usage are prose, so those go to the text-generation backend when one is
// configured.
//
// Backend failures fall back to the template unless the synthesizer is
// strict, in which case they surface as ForgeError::Synthesis.
// =============================================================================

pub mod prompt;
pub mod templates;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analyzer::{self, ProjectAnalysis};
use crate::error::{ForgeError, Result};
use crate::github::RepositoryDescriptor;
use crate::llm::TextGenerator;
use crate::sections::{Section, SectionSet};

/// Produces README sections for a repository.
#[derive(Clone)]
pub struct Synthesizer {
    generator: Option<Arc<dyn TextGenerator>>,
    fallback: bool,
}

impl Synthesizer {
    /// A synthesizer that never calls a backend.
    pub fn templates_only() -> Self {
        Self {
            generator: None,
            fallback: true,
        }
    }

    /// A synthesizer that generates prose sections with `generator`.
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
            fallback: true,
        }
    }

    /// In strict mode backend failures are errors instead of falling back
    /// to templates.
    pub fn strict(mut self, strict: bool) -> Self {
        self.fallback = !strict;
        self
    }

    pub fn is_generative(&self) -> bool {
        self.generator.is_some()
    }

    /// Builds every baseline section for `descriptor`.
    pub async fn synthesize(&self, descriptor: &RepositoryDescriptor) -> Result<SectionSet> {
        let analysis = analyzer::analyze(descriptor);
        debug!(
            project_type = %analysis.project_type,
            frameworks = ?analysis.frameworks,
            "project analysis"
        );

        let mut sections = SectionSet::new();
        for section in Section::BASELINE {
            let text = self.section_text(section, descriptor, &analysis).await?;
            sections.insert(section, text);
        }

        info!(
            repository = %descriptor.full_name(),
            generative = self.is_generative(),
            "synthesized sections"
        );
        Ok(sections)
    }

    async fn section_text(
        &self,
        section: Section,
        descriptor: &RepositoryDescriptor,
        analysis: &ProjectAnalysis,
    ) -> Result<String> {
        let text = match section {
            Section::Title => templates::title(descriptor),
            Section::Description => {
                let template = templates::description(descriptor, analysis);
                // A description written by the owner beats anything we generate
                if descriptor.description.is_some() {
                    template
                } else {
                    self.generate(section, descriptor, analysis, template).await?
                }
            }
            Section::Features => {
                let template = templates::features(descriptor, analysis);
                self.generate(section, descriptor, analysis, template).await?
            }
            Section::TechnologyStack => templates::technology_stack(descriptor, analysis),
            Section::Installation => templates::installation(descriptor, analysis),
            Section::Usage => {
                let template = templates::usage(descriptor, analysis);
                self.generate(section, descriptor, analysis, template).await?
            }
            Section::ProjectStructure => templates::project_structure(descriptor),
            Section::Contributing => templates::contributing(descriptor),
            Section::License => templates::license(descriptor),
        };
        Ok(text)
    }

    async fn generate(
        &self,
        section: Section,
        descriptor: &RepositoryDescriptor,
        analysis: &ProjectAnalysis,
        template: String,
    ) -> Result<String> {
        let Some(generator) = &self.generator else {
            return Ok(template);
        };

        let prompt = prompt::section_prompt(section, descriptor, analysis);
        match generator.generate(Some(prompt::SYSTEM_PROMPT), &prompt).await {
            Ok(text) => Ok(text),
            Err(e) if self.fallback => {
                warn!(
                    %section,
                    backend = generator.name(),
                    error = %e,
                    "generation failed, using template"
                );
                Ok(template)
            }
            Err(e) => Err(ForgeError::Synthesis {
                section,
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{Manifest, ManifestKind, RepoFile};
    use crate::llm::GenerationError;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    struct CannedGenerator {
        reply: std::result::Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(
            &self,
            _system: Option<&str>,
            prompt: &str,
        ) -> std::result::Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|_| GenerationError::Unavailable("connection refused".to_string()))
        }
    }

    fn descriptor() -> RepositoryDescriptor {
        RepositoryDescriptor {
            identifier: "octo/demo".to_string(),
            owner: "octo".to_string(),
            name: "demo".to_string(),
            description: None,
            primary_language: Some("Python".to_string()),
            languages: BTreeMap::new(),
            license: None,
            homepage: None,
            default_branch: "main".to_string(),
            stars: 0,
            forks: 0,
            topics: Vec::new(),
            top_level: Vec::new(),
            files: Vec::new(),
            manifests: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_templates_cover_every_section() {
        let sections = Synthesizer::templates_only()
            .synthesize(&descriptor())
            .await
            .unwrap();
        assert!(sections.is_complete());
        assert_eq!(sections.get(Section::Title), Some("demo"));
        assert!(sections.get(Section::TechnologyStack).unwrap().contains("Python"));
    }

    #[tokio::test]
    async fn test_generator_fills_prose_sections() {
        let generator = Arc::new(CannedGenerator::ok("Generated text"));
        let sections = Synthesizer::with_generator(generator.clone())
            .synthesize(&descriptor())
            .await
            .unwrap();

        assert_eq!(sections.get(Section::Description), Some("Generated text"));
        assert_eq!(sections.get(Section::Features), Some("Generated text"));
        assert_eq!(sections.get(Section::Usage), Some("Generated text"));
        assert_ne!(sections.get(Section::License), Some("Generated text"));
        assert_eq!(generator.prompts.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_existing_description_is_not_regenerated() {
        let generator = Arc::new(CannedGenerator::ok("Generated text"));
        let mut d = descriptor();
        d.description = Some("Hand written".to_string());

        let sections = Synthesizer::with_generator(generator.clone())
            .synthesize(&d)
            .await
            .unwrap();
        assert_eq!(sections.get(Section::Description), Some("Hand written"));
        assert_eq!(generator.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back_to_templates() {
        let mut d = descriptor();
        d.files.push(RepoFile {
            path: "requirements.txt".to_string(),
            size: 10,
            content: "streamlit\n".to_string(),
        });
        d.manifests.push(Manifest {
            path: "requirements.txt".to_string(),
            kind: ManifestKind::Requirements,
            content: "streamlit\n".to_string(),
        });

        let sections = Synthesizer::with_generator(Arc::new(CannedGenerator::failing()))
            .synthesize(&d)
            .await
            .unwrap();
        assert!(sections.is_complete());
        assert!(sections.get(Section::Usage).unwrap().contains("streamlit run"));
    }

    #[tokio::test]
    async fn test_strict_mode_surfaces_synthesis_error() {
        let err = Synthesizer::with_generator(Arc::new(CannedGenerator::failing()))
            .strict(true)
            .synthesize(&descriptor())
            .await
            .unwrap_err();

        match err {
            ForgeError::Synthesis { section, reason } => {
                assert_eq!(section, Section::Description);
                assert!(reason.contains("connection refused"));
            }
            other => panic!("expected synthesis error, got {other:?}"),
        }
    }
}
