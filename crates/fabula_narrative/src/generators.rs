//! Stage generators.
//!
//! Each generator turns structured inputs into a prompt and sends it to the
//! backend. Every call passes through the admission check first.

use crate::{Stage, StageOptions, prompts};
use fabula_core::{Completion, StoryFoundation, Topic};
use fabula_error::{ConfigError, FabulaResult};
use fabula_interface::{AdmissionCheck, InferenceDriver};
use tracing::{debug, info, instrument};

/// Request builders for every pipeline stage, bound to one backend.
pub struct StageGenerators<D: InferenceDriver, A: AdmissionCheck> {
    driver: D,
    admission: A,
    options: StageOptions,
}

impl<D: InferenceDriver, A: AdmissionCheck> StageGenerators<D, A> {
    /// Creates generators with default per-stage options.
    pub fn new(driver: D, admission: A) -> Self {
        Self::with_options(driver, admission, StageOptions::default())
    }

    /// Creates generators with explicit per-stage options.
    pub fn with_options(driver: D, admission: A, options: StageOptions) -> Self {
        Self {
            driver,
            admission,
            options,
        }
    }

    /// Get a reference to the underlying backend driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a reference to the admission check.
    pub fn admission(&self) -> &A {
        &self.admission
    }

    /// Get the per-stage options.
    pub fn options(&self) -> &StageOptions {
        &self.options
    }

    /// Admits, then sends `prompt` with the options configured for `stage`.
    #[instrument(skip(self, prompt), fields(stage = %stage, provider = self.driver.provider_name(), model = %self.driver.model_name()))]
    async fn call(&self, stage: Stage, prompt: String) -> Completion {
        self.admission.admit().await;

        let options = self.options.get(stage);
        let completion = self.driver.complete(&prompt, &options).await;

        debug!(
            prompt_chars = prompt.len(),
            response_chars = completion.text().len(),
            empty = completion.is_empty(),
            "Stage call complete"
        );

        completion
    }

    /// Setting description.
    pub async fn generate_world(&self, topic: &Topic) -> Completion {
        self.call(Stage::WorldBuilder, prompts::world_prompt(topic))
            .await
    }

    /// Main characters.
    pub async fn generate_characters(&self, topic: &Topic) -> Completion {
        self.call(Stage::CharacterBuilder, prompts::characters_prompt(topic))
            .await
    }

    /// Central theme, informed by the world and characters.
    pub async fn generate_theme(&self, topic: &Topic, world: &str, characters: &str) -> Completion {
        self.call(
            Stage::ThemeBuilder,
            prompts::theme_prompt(topic, world, characters),
        )
        .await
    }

    /// Tone and voice directives.
    pub async fn generate_style(&self, topic: &Topic) -> Completion {
        self.call(Stage::StyleGuide, prompts::style_prompt(topic))
            .await
    }

    /// Outline in `parts` parts.
    pub async fn generate_outline(
        &self,
        topic: &Topic,
        world: &str,
        characters: &str,
        theme: &str,
        parts: usize,
    ) -> Completion {
        self.call(
            Stage::PlotPlanner,
            prompts::outline_prompt(topic, world, characters, theme, parts),
        )
        .await
    }

    /// Next section of the story.
    pub async fn generate_section(
        &self,
        foundation: &StoryFoundation,
        rolling_context: &str,
        index: usize,
        total: usize,
        target_words: usize,
    ) -> Completion {
        self.call(
            Stage::SectionWriter,
            prompts::section_prompt(foundation, rolling_context, index, total, target_words),
        )
        .await
    }

    /// Critique of a section, expected to embed a score.
    pub async fn critique_section(&self, section: &str) -> Completion {
        self.call(Stage::SectionCritic, prompts::critique_prompt(section))
            .await
    }

    /// Revision of a section using its critique.
    pub async fn edit_section(&self, section: &str, critique: &str) -> Completion {
        self.call(Stage::SectionEditor, prompts::edit_prompt(section, critique))
            .await
    }

    /// Rolling digest of the story so far.
    pub async fn summarize(&self, story_so_far: &str) -> Completion {
        self.call(Stage::Summarizer, prompts::summary_prompt(story_so_far))
            .await
    }

    /// Whole-story revision pass.
    pub async fn macro_edit(&self, story: &str) -> Completion {
        self.call(Stage::MacroEditor, prompts::macro_edit_prompt(story))
            .await
    }

    /// One-shot short story for draft mode.
    pub async fn generate_draft(&self, topic: &Topic, target_words: usize) -> Completion {
        self.call(
            Stage::DraftWriter,
            prompts::draft_prompt(topic, target_words),
        )
        .await
    }

    /// Builds the foundation for one story: world, characters, theme, style,
    /// then an outline with `parts` parts.
    ///
    /// Empty stage outputs are kept as empty fields.
    ///
    /// # Errors
    ///
    /// Returns an error only if the foundation cannot be assembled.
    #[instrument(skip(self, topic), fields(topic = %topic))]
    pub async fn build_foundation(
        &self,
        topic: &Topic,
        parts: usize,
    ) -> FabulaResult<StoryFoundation> {
        let world = self.generate_world(topic).await.into_text();
        let characters = self.generate_characters(topic).await.into_text();
        let theme = self
            .generate_theme(topic, &world, &characters)
            .await
            .into_text();
        let style = self.generate_style(topic).await.into_text();
        let outline = self
            .generate_outline(topic, &world, &characters, &theme, parts)
            .await
            .into_text();

        info!(
            world_chars = world.len(),
            characters_chars = characters.len(),
            theme_chars = theme.len(),
            style_chars = style.len(),
            outline_chars = outline.len(),
            "Foundation generated"
        );

        let foundation = StoryFoundation::builder()
            .topic(topic.clone())
            .world(world)
            .characters(characters)
            .theme(theme)
            .style(style)
            .outline(outline)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to assemble foundation: {}", e)))?;

        Ok(foundation)
    }
}
