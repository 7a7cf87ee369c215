//! Song structure templates.

use rand::Rng;
use songloom_spec::SectionKind::{Breakdown, Bridge, Chorus, Intro, Outro, PreChorus, Verse};
use songloom_spec::{Section, SongStructure, StructureTemplate};

use crate::error::{ComposeError, ComposeResult};

/// Built-in templates as `(name, sections)`.
const BUILTIN: &[(&str, &[Section])] = &[
    (
        "radio",
        &[
            Section::new(Intro, 2),
            Section::new(Verse, 4),
            Section::new(PreChorus, 2),
            Section::new(Chorus, 4),
            Section::new(Verse, 4),
            Section::new(PreChorus, 2),
            Section::new(Chorus, 4),
            Section::new(Bridge, 4),
            Section::new(Chorus, 4),
            Section::new(Outro, 2),
        ],
    ),
    (
        "short",
        &[
            Section::new(Intro, 2),
            Section::new(Verse, 4),
            Section::new(Chorus, 4),
            Section::new(Outro, 2),
        ],
    ),
    (
        "build",
        &[
            Section::new(Intro, 4),
            Section::new(Verse, 4),
            Section::new(Breakdown, 2),
            Section::new(PreChorus, 2),
            Section::new(Chorus, 8),
            Section::new(Outro, 2),
        ],
    ),
    (
        "ballad",
        &[
            Section::new(Intro, 2),
            Section::new(Verse, 8),
            Section::new(Chorus, 4),
            Section::new(Bridge, 4),
            Section::new(Chorus, 4),
            Section::new(Outro, 4),
        ],
    ),
    (
        "loop",
        &[
            Section::new(Verse, 4),
            Section::new(Chorus, 4),
            Section::new(Verse, 4),
            Section::new(Chorus, 4),
        ],
    ),
];

/// A validated, non-empty set of templates.
#[derive(Debug, Clone)]
pub struct StructureCatalog {
    templates: Vec<StructureTemplate>,
}

impl StructureCatalog {
    /// Validates templates. An empty catalog, a template with no sections or
    /// a zero-length section is a configuration error.
    pub fn new(templates: Vec<StructureTemplate>) -> ComposeResult<Self> {
        if templates.is_empty() {
            return Err(ComposeError::EmptyCatalog);
        }
        for template in &templates {
            if template.sections.is_empty() {
                return Err(ComposeError::EmptyTemplate {
                    name: template.name.clone(),
                });
            }
            if let Some(index) = template.sections.iter().position(|s| s.length == 0) {
                return Err(ComposeError::ZeroLengthSection {
                    template: template.name.clone(),
                    index,
                });
            }
        }
        Ok(Self { templates })
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN
                .iter()
                .map(|(name, sections)| StructureTemplate {
                    name: name.to_string(),
                    sections: sections.to_vec(),
                })
                .collect(),
        }
    }

    /// Custom templates from configuration; empty means built-in.
    pub fn from_templates(templates: &[StructureTemplate]) -> ComposeResult<Self> {
        if templates.is_empty() {
            Ok(Self::builtin())
        } else {
            Self::new(templates.to_vec())
        }
    }

    /// Looks up a template by name.
    pub fn get(&self, name: &str) -> Option<SongStructure> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .map(|t| SongStructure::new(t.name.clone(), t.sections.clone()))
    }

    /// All templates.
    pub fn templates(&self) -> &[StructureTemplate] {
        &self.templates
    }

    /// Picks one template uniformly.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SongStructure {
        let template = &self.templates[rng.gen_range(0..self.templates.len())];
        tracing::debug!(template = %template.name, "picked structure");
        SongStructure::new(template.name.clone(), template.sections.clone())
    }
}
