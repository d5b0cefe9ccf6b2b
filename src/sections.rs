// src/sections.rs
// =============================================================================
// The fixed vocabulary of README sections, and the SectionSet that maps each
// section to its text.
//
// Section names typed by users ("tech stack", "technology_stack",
// "Technology Stack") all resolve to the same variant. Anything that does not
// resolve is simply not a section; callers decide to skip it.
// =============================================================================

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One named subdivision of the generated README.
///
/// Declaration order is the baseline document order, and `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Title,
    Description,
    Features,
    TechnologyStack,
    Installation,
    Usage,
    ProjectStructure,
    Contributing,
    License,
}

impl Section {
    /// Every section, in baseline order.
    pub const BASELINE: [Section; 9] = [
        Section::Title,
        Section::Description,
        Section::Features,
        Section::TechnologyStack,
        Section::Installation,
        Section::Usage,
        Section::ProjectStructure,
        Section::Contributing,
        Section::License,
    ];

    /// Heading text as it appears in the document.
    pub fn heading(self) -> &'static str {
        match self {
            Section::Title => "Title",
            Section::Description => "Description",
            Section::Features => "Features",
            Section::TechnologyStack => "Technology Stack",
            Section::Installation => "Installation",
            Section::Usage => "Usage",
            Section::ProjectStructure => "Project Structure",
            Section::Contributing => "Contributing",
            Section::License => "License",
        }
    }

    /// Resolves a user-supplied name to a section.
    ///
    /// Matching ignores case and treats `_`, `-` and runs of whitespace
    /// the same. Returns `None` for names outside the vocabulary.
    pub fn from_name(name: &str) -> Option<Section> {
        let normalized = name
            .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let section = match normalized.as_str() {
            "title" => Section::Title,
            "description" => Section::Description,
            "features" => Section::Features,
            "technology stack" | "tech stack" => Section::TechnologyStack,
            "installation" => Section::Installation,
            "usage" => Section::Usage,
            "project structure" => Section::ProjectStructure,
            "contributing" => Section::Contributing,
            "license" => Section::License,
            _ => return None,
        };
        Some(section)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.heading())
    }
}

/// Section text produced by the synthesizer, iterated in baseline order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionSet {
    sections: BTreeMap<Section, String>,
}

impl SectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text for a section, replacing anything already there.
    pub fn insert(&mut self, section: Section, text: impl Into<String>) {
        self.sections.insert(section, text.into());
    }

    pub fn get(&self, section: Section) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }

    pub fn contains(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// True when every baseline section has text.
    pub fn is_complete(&self) -> bool {
        Section::BASELINE.iter().all(|s| self.contains(*s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &str)> {
        self.sections.iter().map(|(s, text)| (*s, text.as_str()))
    }
}
