//! Pipeline and batch configuration.

use crate::StageOptions;
use derive_getters::Getters;
use fabula_core::Topic;
use fabula_error::{StoryError, StoryErrorKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Score thresholds and retry budget for the per-section quality gate.
///
/// # Examples
///
/// ```
/// use fabula_narrative::QualityGate;
///
/// let gate = QualityGate::default();
/// assert_eq!(*gate.retry_below(), 6);
/// assert_eq!(*gate.edit_below(), 8);
/// assert_eq!(*gate.max_retries(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct QualityGate {
    /// Scores below this redraft the section while retries remain
    #[serde(default = "default_retry_below")]
    retry_below: u8,
    /// Final scores below this send the section through the editor
    #[serde(default = "default_edit_below")]
    edit_below: u8,
    /// Redrafts allowed per section after the first attempt
    #[serde(default = "default_max_retries")]
    max_retries: usize,
}

fn default_retry_below() -> u8 {
    6
}

fn default_edit_below() -> u8 {
    8
}

fn default_max_retries() -> usize {
    2
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            retry_below: default_retry_below(),
            edit_below: default_edit_below(),
            max_retries: default_max_retries(),
        }
    }
}

impl QualityGate {
    /// Creates a gate.
    pub fn new(retry_below: u8, edit_below: u8, max_retries: usize) -> Self {
        Self {
            retry_below,
            edit_below,
            max_retries,
        }
    }

    /// Checks that the retry threshold does not exceed the edit threshold.
    ///
    /// # Errors
    ///
    /// Returns [`StoryErrorKind::InvalidThresholds`] otherwise.
    pub fn validate(&self) -> Result<(), StoryError> {
        if self.retry_below > self.edit_below {
            return Err(StoryError::new(StoryErrorKind::InvalidThresholds {
                retry_below: self.retry_below,
                edit_below: self.edit_below,
            }));
        }
        Ok(())
    }
}

/// Shape of one story: length, memory cadence, context and gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct PipelineConfig {
    /// Number of sections to write
    #[serde(default = "default_sections")]
    sections: usize,
    /// Recompute the memory digest after every `summary_every`-th section
    #[serde(default = "default_summary_every")]
    summary_every: usize,
    /// Recent sections quoted verbatim in each section prompt
    #[serde(default = "default_context_sections")]
    context_sections: usize,
    /// Word target passed to the section writer
    #[serde(default = "default_section_words")]
    section_words: usize,
    /// Run one whole-story revision pass after the last section
    #[serde(default = "default_macro_edit")]
    macro_edit: bool,
    /// Per-section quality gate
    #[serde(default)]
    gate: QualityGate,
    /// Per-stage sampling overrides
    #[serde(default)]
    stage_options: StageOptions,
}

fn default_sections() -> usize {
    5
}

fn default_summary_every() -> usize {
    1
}

fn default_context_sections() -> usize {
    2
}

fn default_section_words() -> usize {
    500
}

fn default_macro_edit() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::short_form()
    }
}

impl PipelineConfig {
    /// Short pipeline: five sections, digest refreshed after every section.
    pub fn short_form() -> Self {
        Self {
            sections: default_sections(),
            summary_every: default_summary_every(),
            context_sections: default_context_sections(),
            section_words: default_section_words(),
            macro_edit: default_macro_edit(),
            gate: QualityGate::default(),
            stage_options: StageOptions::default(),
        }
    }

    /// Long pipeline: twenty longer sections, digest refreshed every third.
    pub fn long_form() -> Self {
        Self {
            sections: 20,
            summary_every: 3,
            section_words: 1000,
            ..Self::short_form()
        }
    }

    /// Sets the section count.
    pub fn with_sections(mut self, sections: usize) -> Self {
        self.sections = sections;
        self
    }

    /// Sets the digest cadence.
    pub fn with_summary_every(mut self, summary_every: usize) -> Self {
        self.summary_every = summary_every;
        self
    }

    /// Sets the number of recent sections carried as context.
    pub fn with_context_sections(mut self, context_sections: usize) -> Self {
        self.context_sections = context_sections;
        self
    }

    /// Sets the section word target.
    pub fn with_section_words(mut self, section_words: usize) -> Self {
        self.section_words = section_words;
        self
    }

    /// Enables or disables the closing revision pass.
    pub fn with_macro_edit(mut self, macro_edit: bool) -> Self {
        self.macro_edit = macro_edit;
        self
    }

    /// Sets the quality gate.
    pub fn with_gate(mut self, gate: QualityGate) -> Self {
        self.gate = gate;
        self
    }

    /// Sets the per-stage sampling overrides.
    pub fn with_stage_options(mut self, stage_options: StageOptions) -> Self {
        self.stage_options = stage_options;
        self
    }

    /// Returns true if the digest is recomputed after section `index` (0-based).
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_narrative::PipelineConfig;
    ///
    /// let config = PipelineConfig::short_form().with_summary_every(3);
    /// let points: Vec<usize> = (0..7).filter(|i| config.summarizes_after(*i)).collect();
    /// assert_eq!(points, vec![0, 3, 6]);
    /// ```
    pub fn summarizes_after(&self, index: usize) -> bool {
        self.summary_every > 0 && index % self.summary_every == 0
    }

    /// Checks section count, cadence and gate.
    ///
    /// # Errors
    ///
    /// Returns a [`StoryError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), StoryError> {
        if self.sections == 0 {
            return Err(StoryError::new(StoryErrorKind::ZeroSections));
        }
        if self.summary_every == 0 {
            return Err(StoryError::new(StoryErrorKind::ZeroCadence));
        }
        self.gate.validate()
    }
}

/// Which stories to write and where their artifacts go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BatchConfig {
    /// Topics to write stories about, in order
    #[serde(default)]
    topics: Vec<String>,
    /// Stories written per topic
    #[serde(default = "default_runs_per_topic")]
    runs_per_topic: usize,
    /// Pause between consecutive runs, in seconds
    #[serde(default = "default_run_cooldown_secs")]
    run_cooldown_secs: u64,
    /// Pause after a failed run, in seconds
    #[serde(default = "default_fault_cooldown_secs")]
    fault_cooldown_secs: u64,
    /// Directory receiving one story file per run
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    /// Append-only run log
    #[serde(default = "default_log_path")]
    log_path: PathBuf,
}

fn default_runs_per_topic() -> usize {
    1
}

fn default_run_cooldown_secs() -> u64 {
    10
}

fn default_fault_cooldown_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("stories")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("stories/story_log.txt")
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            topics: Vec::new(),
            runs_per_topic: default_runs_per_topic(),
            run_cooldown_secs: default_run_cooldown_secs(),
            fault_cooldown_secs: default_fault_cooldown_secs(),
            output_dir: default_output_dir(),
            log_path: default_log_path(),
        }
    }
}

impl BatchConfig {
    /// Creates a batch over `topics` with default cooldowns and paths.
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            ..Self::default()
        }
    }

    /// Replaces the topic list.
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    /// Sets the runs per topic.
    pub fn with_runs_per_topic(mut self, runs_per_topic: usize) -> Self {
        self.runs_per_topic = runs_per_topic;
        self
    }

    /// Sets both cooldowns, in seconds.
    pub fn with_cooldowns(mut self, run_cooldown_secs: u64, fault_cooldown_secs: u64) -> Self {
        self.run_cooldown_secs = run_cooldown_secs;
        self.fault_cooldown_secs = fault_cooldown_secs;
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the run log path.
    pub fn with_log_path(mut self, log_path: impl Into<PathBuf>) -> Self {
        self.log_path = log_path.into();
        self
    }

    /// Pause between consecutive runs.
    pub fn run_cooldown(&self) -> Duration {
        Duration::from_secs(self.run_cooldown_secs)
    }

    /// Pause after a failed run.
    pub fn fault_cooldown(&self) -> Duration {
        Duration::from_secs(self.fault_cooldown_secs)
    }

    /// Checks that the batch has at least one run and no blank topics.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`BatchConfig::run_topics`].
    pub fn validate(&self) -> Result<(), StoryError> {
        self.run_topics().map(|_| ())
    }

    /// Expands topics into the run sequence, each topic repeated
    /// `runs_per_topic` times.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no topics or a topic is blank.
    pub fn run_topics(&self) -> Result<Vec<Topic>, StoryError> {
        if self.topics.is_empty() || self.runs_per_topic == 0 {
            return Err(StoryError::new(StoryErrorKind::NoTopics));
        }

        let mut runs = Vec::with_capacity(self.topics.len() * self.runs_per_topic);
        for text in &self.topics {
            let topic = Topic::new(text.as_str())?;
            for _ in 0..self.runs_per_topic {
                runs.push(topic.clone());
            }
        }
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_short_form() {
        let config = PipelineConfig::default();
        assert_eq!(*config.sections(), 5);
        assert_eq!(*config.summary_every(), 1);
        assert_eq!(*config.context_sections(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_long_form_cadence() {
        let config = PipelineConfig::long_form();
        assert_eq!(*config.sections(), 20);
        assert_eq!(*config.summary_every(), 3);
        assert!(config.summarizes_after(0));
        assert!(!config.summarizes_after(1));
        assert!(config.summarizes_after(18));
    }

    #[test]
    fn test_zero_sections_rejected() {
        let err = PipelineConfig::default()
            .with_sections(0)
            .validate()
            .unwrap_err();
        assert_eq!(err.kind, StoryErrorKind::ZeroSections);
    }

    #[test]
    fn test_zero_cadence_rejected() {
        let err = PipelineConfig::default()
            .with_summary_every(0)
            .validate()
            .unwrap_err();
        assert_eq!(err.kind, StoryErrorKind::ZeroCadence);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let err = PipelineConfig::default()
            .with_gate(QualityGate::new(9, 7, 2))
            .validate()
            .unwrap_err();
        assert!(matches!(err.kind, StoryErrorKind::InvalidThresholds { .. }));
    }

    #[test]
    fn test_run_topics_repeats_each_topic() {
        let batch = BatchConfig::new(vec!["Storm".into(), "Drought".into()]).with_runs_per_topic(2);
        let topics: Vec<String> = batch
            .run_topics()
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(topics, vec!["Storm", "Storm", "Drought", "Drought"]);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = BatchConfig::default().run_topics().unwrap_err();
        assert_eq!(err.kind, StoryErrorKind::NoTopics);
    }

    #[test]
    fn test_blank_topic_rejected() {
        let err = BatchConfig::new(vec!["  ".into()]).run_topics().unwrap_err();
        assert_eq!(err.kind, StoryErrorKind::EmptyTopic);
    }
}
