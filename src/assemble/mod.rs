// src/assemble/mod.rs
// =============================================================================
// The document assembler: SectionSet + CustomizationOptions -> README text.
//
// This step is a pure function. It does no I/O and cannot fail; section
// names in the options that are not part of the vocabulary are logged and
// skipped.
//
// Layout rules:
// - Title renders as "# {text}", every other section as "## {Heading}"
// - sections are separated by one blank line, the document ends with "\n"
// - synthesized bodies are normalized (see normalize.rs), overrides are not
// =============================================================================

mod normalize;

pub use normalize::normalize_body;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::warn;

use crate::sections::{Section, SectionSet};

/// User customization of the generated document.
///
/// All names are raw user text; they are matched against the section
/// vocabulary when the document is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomizationOptions {
    /// Sections to keep. `None` keeps every baseline section.
    pub include_sections: Option<Vec<String>>,
    /// Sections to put first, in this order. The rest follow in baseline order.
    pub section_order: Vec<String>,
    /// Replacement text per section.
    pub overrides: BTreeMap<String, String>,
}

impl CustomizationOptions {
    /// Parses an options file.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Layers `other` on top of `self`: a given include list or order
    /// replaces ours, overrides are merged with `other` winning.
    pub fn merged_with(mut self, other: CustomizationOptions) -> Self {
        if other.include_sections.is_some() {
            self.include_sections = other.include_sections;
        }
        if !other.section_order.is_empty() {
            self.section_order = other.section_order;
        }
        self.overrides.extend(other.overrides);
        self
    }

    /// The sections that will be rendered, in rendering order.
    pub fn plan(&self) -> Vec<Section> {
        let selected: BTreeSet<Section> = match &self.include_sections {
            None => Section::BASELINE.into_iter().collect(),
            Some(names) => names.iter().filter_map(|n| resolve(n, "include_sections")).collect(),
        };

        let mut plan: Vec<Section> = Vec::with_capacity(selected.len());
        for name in &self.section_order {
            if let Some(section) = resolve(name, "section_order") {
                if selected.contains(&section) && !plan.contains(&section) {
                    plan.push(section);
                }
            }
        }
        for section in Section::BASELINE {
            if selected.contains(&section) && !plan.contains(&section) {
                plan.push(section);
            }
        }
        plan
    }

    /// Override text per recognized section.
    fn resolved_overrides(&self) -> BTreeMap<Section, &str> {
        self.overrides
            .iter()
            .filter_map(|(name, text)| resolve(name, "overrides").map(|s| (s, text.as_str())))
            .collect()
    }
}

fn resolve(name: &str, field: &str) -> Option<Section> {
    let section = Section::from_name(name);
    if section.is_none() {
        warn!(name, field, "ignoring unrecognized section name");
    }
    section
}

/// The finished README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReadme(String);

impl GeneratedReadme {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GeneratedReadme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders `sections` into a Markdown document according to `options`.
pub fn assemble(sections: &SectionSet, options: &CustomizationOptions) -> GeneratedReadme {
    let overrides = options.resolved_overrides();
    let mut blocks: Vec<String> = Vec::new();

    for section in options.plan() {
        let body = match overrides.get(&section) {
            Some(text) => text.trim_matches('\n').to_string(),
            None => match sections.get(section) {
                Some(text) if section == Section::Title => text.trim().to_string(),
                Some(text) => normalize_body(section.heading(), text),
                None => String::new(),
            },
        };
        blocks.push(render_block(section, &body));
    }

    if blocks.is_empty() {
        return GeneratedReadme(String::new());
    }
    let mut document = blocks.join("\n\n");
    document.push('\n');
    GeneratedReadme(document)
}

fn render_block(section: Section, body: &str) -> String {
    if section == Section::Title {
        return format!("# {}", body);
    }
    if body.trim().is_empty() {
        format!("## {}", section.heading())
    } else {
        format!("## {}\n\n{}", section.heading(), body)
    }
}
