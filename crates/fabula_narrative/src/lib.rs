//! Section generation and quality-gate pipeline for Fabula.
//!
//! This crate turns a topic into a finished story:
//! - [`StageGenerators`] build prompts for each stage and call the backend
//!   through an admission check
//! - [`ScoreExtractor`] reads scores out of critic feedback
//! - [`SectionPipeline`] drafts, gates, edits and appends sections while
//!   keeping a rolling memory digest
//! - [`StoryAssembler`] runs batches of stories and survives failed runs

mod assembler;
mod config;
mod draft;
mod generators;
mod pipeline;
mod prompts;
mod records;
mod score;
mod sinks;
mod stage;

pub use assembler::{BatchReport, RunOutcome, RunRecord, StoryAssembler};
pub use config::{BatchConfig, PipelineConfig, QualityGate};
pub use draft::{DRAFT_WORDS, Draft, draft_story};
pub use generators::StageGenerators;
pub use pipeline::{SectionPipeline, SectionReport, StoryRun};
pub use prompts::rolling_context;
pub use score::{MAX_SCORE, MIN_SCORE, NO_SCORE, ScoreExtractor, ScoreRule, extract_score};
pub use sinks::{FileRunLog, FileStoryStore, MemoryRunLog, MemoryStoryStore, RECORD_SEPARATOR};
pub use stage::{Stage, StageOptions};
