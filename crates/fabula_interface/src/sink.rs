//! Run log and story artifact sinks.

use async_trait::async_trait;
use fabula_error::FabulaResult;
use std::path::PathBuf;

/// Append-only record of pipeline steps.
///
/// Records are human-readable and never rewritten once appended.
#[async_trait]
pub trait RunLog: Send + Sync {
    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be persisted.
    async fn append(&self, record: &str) -> FabulaResult<()>;
}

/// Destination for assembled stories, one artifact per run.
#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Persists the story text for run `run_index`, returning its location.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact could not be written.
    async fn persist(&self, run_index: usize, text: &str) -> FabulaResult<PathBuf>;
}
