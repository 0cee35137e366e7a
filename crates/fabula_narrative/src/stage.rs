//! Generation stages and their sampling options.

use fabula_core::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every kind of request the pipeline sends to the backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// Setting description
    WorldBuilder,
    /// Main characters
    CharacterBuilder,
    /// Central theme
    ThemeBuilder,
    /// Tone and voice directives
    StyleGuide,
    /// Part-by-part outline
    PlotPlanner,
    /// Next story section
    SectionWriter,
    /// Scored critique of a section
    SectionCritic,
    /// Revision of a section using its critique
    SectionEditor,
    /// Rolling memory digest
    Summarizer,
    /// Whole-story revision pass
    MacroEditor,
    /// One-shot short story for draft mode
    DraftWriter,
}

impl Stage {
    /// Opening line of every prompt for this stage.
    pub fn persona(&self) -> &'static str {
        match self {
            Stage::WorldBuilder => "You are a worldbuilder for literary fiction.",
            Stage::CharacterBuilder => "You are a character designer for literary fiction.",
            Stage::ThemeBuilder => "You are a story consultant who distills themes.",
            Stage::StyleGuide => "You are a prose stylist writing a style guide.",
            Stage::PlotPlanner => "You are a plot architect outlining a story.",
            Stage::SectionWriter => "You are a novelist writing one section of a longer story.",
            Stage::SectionCritic => "You are a strict literary critic.",
            Stage::SectionEditor => "You are a professional fiction editor.",
            Stage::Summarizer => "You are a story archivist keeping a running summary.",
            Stage::MacroEditor => "You are a senior editor revising a complete manuscript.",
            Stage::DraftWriter => "You are a creative fiction writer.",
        }
    }

    /// Built-in sampling options for this stage.
    pub fn default_options(&self) -> GenerationOptions {
        match self {
            Stage::WorldBuilder
            | Stage::CharacterBuilder
            | Stage::ThemeBuilder
            | Stage::StyleGuide => GenerationOptions::new(Some(400), Some(0.8)),
            Stage::PlotPlanner => GenerationOptions::new(Some(800), Some(0.7)),
            Stage::SectionWriter => GenerationOptions::new(Some(1500), Some(0.8)),
            Stage::SectionCritic => GenerationOptions::new(Some(400), Some(0.3)),
            Stage::SectionEditor => GenerationOptions::new(Some(1500), Some(0.6)),
            Stage::Summarizer => GenerationOptions::new(Some(350), Some(0.3)),
            Stage::MacroEditor => GenerationOptions::new(None, Some(0.5)),
            Stage::DraftWriter => GenerationOptions::new(Some(600), Some(0.8)),
        }
    }
}

/// Per-stage overrides of sampling options.
///
/// Stages without an override use [`Stage::default_options`].
///
/// # Examples
///
/// ```
/// use fabula_core::GenerationOptions;
/// use fabula_narrative::{Stage, StageOptions};
///
/// let mut options = StageOptions::default();
/// options.set(Stage::SectionCritic, GenerationOptions::new(Some(200), Some(0.1)));
///
/// assert_eq!(*options.get(Stage::SectionCritic).max_tokens(), Some(200));
/// assert_eq!(options.get(Stage::Summarizer), Stage::Summarizer.default_options());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageOptions(BTreeMap<Stage, GenerationOptions>);

impl StageOptions {
    /// Options for `stage`, falling back to its defaults.
    pub fn get(&self, stage: Stage) -> GenerationOptions {
        self.0
            .get(&stage)
            .copied()
            .unwrap_or_else(|| stage.default_options())
    }

    /// Overrides the options for `stage`.
    pub fn set(&mut self, stage: Stage, options: GenerationOptions) {
        self.0.insert(stage, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_personas_are_distinct_prefixes() {
        for a in Stage::iter() {
            for b in Stage::iter() {
                if a != b {
                    assert!(
                        !a.persona().starts_with(b.persona()),
                        "{} persona starts with {} persona",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_stage_names_are_snake_case() {
        assert_eq!(Stage::SectionCritic.to_string(), "section_critic");
        assert_eq!(Stage::MacroEditor.as_ref(), "macro_editor");
    }
}
