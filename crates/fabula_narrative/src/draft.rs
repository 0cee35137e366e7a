//! Single-pass draft mode: write, critique, rewrite.

use crate::{ScoreExtractor, StageGenerators};
use derive_getters::Getters;
use fabula_core::{Critique, Topic};
use fabula_interface::{AdmissionCheck, InferenceDriver};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Word target for draft mode stories.
pub const DRAFT_WORDS: usize = 300;

/// Result of a draft-mode run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Draft {
    /// First draft
    first_draft: String,
    /// Critique of the first draft
    critique: Critique,
    /// Rewrite incorporating the critique
    story: String,
}

/// Writes a short story, critiques it once and rewrites it with the
/// critique. No quality gate is applied; the rewrite always happens.
#[instrument(skip(generators, topic), fields(topic = %topic))]
pub async fn draft_story<D, A>(
    generators: &StageGenerators<D, A>,
    topic: &Topic,
    target_words: usize,
) -> Draft
where
    D: InferenceDriver,
    A: AdmissionCheck,
{
    let first_draft = generators
        .generate_draft(topic, target_words)
        .await
        .into_text();
    let feedback = generators
        .critique_section(&first_draft)
        .await
        .into_text();
    let critique = Critique::new(feedback.clone(), ScoreExtractor::default().extract(&feedback));
    let story = generators
        .edit_section(&first_draft, critique.text())
        .await
        .into_text();

    info!(
        draft_chars = first_draft.len(),
        score = critique.score(),
        story_chars = story.len(),
        "Draft complete"
    );

    Draft {
        first_draft,
        critique,
        story,
    }
}
