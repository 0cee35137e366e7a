//! Section pipeline.
//!
//! For each section the pipeline drafts, critiques and scores, redrafts while
//! the score is below the retry threshold and retries remain, edits when the
//! final score is below the edit threshold, appends the adopted text and
//! refreshes the memory digest on its cadence.

use crate::{PipelineConfig, ScoreExtractor, StageGenerators, prompts, records};
use derive_getters::Getters;
use fabula_core::{Critique, MemorySummary, Sections, StoryFoundation};
use fabula_error::FabulaResult;
use fabula_interface::{AdmissionCheck, InferenceDriver, RunLog};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// What happened to one section on its way through the quality gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct SectionReport {
    /// Position in the story (0-based)
    index: usize,
    /// Drafts written, including the first
    attempts: usize,
    /// Score of the last critique
    final_score: u8,
    /// Whether the editor rewrote the adopted draft
    edited: bool,
}

/// State owned by one story run.
///
/// Holds exactly one foundation, the append-only sections, the latest memory
/// digest and per-section reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct StoryRun {
    /// Foundation built once before the first section
    foundation: StoryFoundation,
    /// Approved sections in order
    sections: Sections,
    /// Latest memory digest
    memory: MemorySummary,
    /// One report per appended section
    reports: Vec<SectionReport>,
    /// Section indices after which the digest was recomputed
    summary_points: Vec<usize>,
    /// Last critique for each appended section
    critiques: Vec<Critique>,
    /// Final story text, set once all sections are written
    story: Option<String>,
}

impl StoryRun {
    /// Starts a run from a foundation.
    pub fn new(foundation: StoryFoundation) -> Self {
        Self {
            foundation,
            sections: Sections::default(),
            memory: MemorySummary::default(),
            reports: Vec::new(),
            summary_points: Vec::new(),
            critiques: Vec::new(),
            story: None,
        }
    }

    /// Sections joined with blank lines.
    pub fn assembled(&self) -> String {
        self.sections.joined()
    }
}

/// Draft that came out of the retry loop with its last critique.
struct GatedDraft {
    text: String,
    critique: Critique,
    attempts: usize,
}

/// Drives one story from foundation to finished text.
pub struct SectionPipeline<'a, D: InferenceDriver, A: AdmissionCheck> {
    generators: &'a StageGenerators<D, A>,
    config: &'a PipelineConfig,
    scorer: ScoreExtractor,
}

impl<'a, D: InferenceDriver, A: AdmissionCheck> SectionPipeline<'a, D, A> {
    /// Creates a pipeline with the default score rules.
    pub fn new(generators: &'a StageGenerators<D, A>, config: &'a PipelineConfig) -> Self {
        Self::with_scorer(generators, config, ScoreExtractor::default())
    }

    /// Creates a pipeline with custom score rules.
    pub fn with_scorer(
        generators: &'a StageGenerators<D, A>,
        config: &'a PipelineConfig,
        scorer: ScoreExtractor,
    ) -> Self {
        Self {
            generators,
            config,
            scorer,
        }
    }

    /// Writes every configured section, then assembles the story and
    /// optionally runs the closing revision pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the run log
    /// rejects a record. Backend failures never surface here.
    #[instrument(skip_all, fields(topic = %foundation.topic(), sections = *self.config.sections()))]
    pub async fn run(
        &self,
        foundation: StoryFoundation,
        log: &dyn RunLog,
    ) -> FabulaResult<StoryRun> {
        self.config.validate()?;

        let mut run = StoryRun::new(foundation);
        for index in 0..*self.config.sections() {
            self.write_section(&mut run, index, log).await?;
        }

        let story = self.finish(&run, log).await?;
        run.story = Some(story);

        info!(
            sections = run.sections.len(),
            summaries = run.summary_points.len(),
            edited = run.reports.iter().filter(|r| r.edited).count(),
            "Story run complete"
        );

        Ok(run)
    }

    /// Takes section `index` through the gate and appends it.
    #[instrument(skip(self, run, log))]
    async fn write_section(
        &self,
        run: &mut StoryRun,
        index: usize,
        log: &dyn RunLog,
    ) -> FabulaResult<()> {
        let context = prompts::rolling_context(
            run.foundation.theme(),
            run.memory.text(),
            &run.sections.last_n(*self.config.context_sections()),
        );

        let gated = self.draft_until_gate(&run.foundation, &context, index).await;

        let gate = self.config.gate();
        let edited = gated.critique.below(*gate.edit_below());
        let adopted = if edited {
            debug!(score = gated.critique.score(), "Score below edit threshold, editing");
            self.generators
                .edit_section(&gated.text, gated.critique.text())
                .await
                .into_text()
        } else {
            gated.text
        };

        let appended_at = run.sections.append(adopted);
        log.append(&records::section_complete(
            appended_at,
            gated.critique.text(),
        ))
        .await?;

        info!(
            section = appended_at,
            attempts = gated.attempts,
            score = gated.critique.score(),
            edited,
            "Section appended"
        );

        run.reports.push(SectionReport {
            index: appended_at,
            attempts: gated.attempts,
            final_score: *gated.critique.score(),
            edited,
        });
        run.critiques.push(gated.critique);

        if self.config.summarizes_after(appended_at) {
            self.refresh_memory(run, log).await?;
        }

        Ok(())
    }

    /// Drafts and critiques, redrafting with the same context while the score
    /// stays below the retry threshold and retries remain.
    async fn draft_until_gate(
        &self,
        foundation: &StoryFoundation,
        context: &str,
        index: usize,
    ) -> GatedDraft {
        let gate = self.config.gate();
        let mut attempts = 0;

        loop {
            attempts += 1;

            let draft = self
                .generators
                .generate_section(
                    foundation,
                    context,
                    index,
                    *self.config.sections(),
                    *self.config.section_words(),
                )
                .await
                .into_text();
            let feedback = self.generators.critique_section(&draft).await.into_text();
            let score = self.scorer.extract(&feedback);
            let critique = Critique::new(feedback, score);

            let retries_used = attempts - 1;
            if critique.below(*gate.retry_below()) && retries_used < *gate.max_retries() {
                debug!(attempt = attempts, score, "Score below retry threshold, redrafting");
                continue;
            }

            if critique.below(*gate.retry_below()) {
                warn!(attempts, score, "Retry budget exhausted");
            }

            return GatedDraft {
                text: draft,
                critique,
                attempts,
            };
        }
    }

    /// Recomputes the digest from every section appended so far.
    async fn refresh_memory(&self, run: &mut StoryRun, log: &dyn RunLog) -> FabulaResult<()> {
        let digest = self
            .generators
            .summarize(&run.sections.joined())
            .await
            .into_text();
        let covers = run.sections.len();

        run.memory = MemorySummary::new(digest, covers);
        run.summary_points.push(covers - 1);
        log.append(&records::memory_updated(covers)).await?;

        debug!(covers, "Memory digest refreshed");
        Ok(())
    }

    /// Assembles the story and applies the optional revision pass.
    ///
    /// This is the one stage whose empty output is detected: drafts,
    /// critiques, edits and summaries are used as returned, but an empty
    /// revision would discard every section, so the assembled text is kept
    /// and the log records that the revision was skipped.
    async fn finish(&self, run: &StoryRun, log: &dyn RunLog) -> FabulaResult<String> {
        let assembled = run.assembled();
        if !*self.config.macro_edit() {
            return Ok(assembled);
        }

        let revised = self.generators.macro_edit(&assembled).await;
        let applied = !revised.is_empty();
        log.append(&records::macro_edit_applied(applied)).await?;

        if applied {
            Ok(revised.into_text())
        } else {
            warn!("Macro edit returned no content, keeping assembled story");
            Ok(assembled)
        }
    }
}
