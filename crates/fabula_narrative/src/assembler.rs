//! Batch run loop.
//!
//! The assembler runs stories one after another. Each run builds a fresh
//! foundation, drives the section pipeline and persists the finished text.
//! A failing run is logged and followed by a cooldown; the batch carries on.

use crate::{BatchConfig, PipelineConfig, SectionPipeline, StageGenerators, StoryRun, records};
use chrono::Utc;
use derive_getters::Getters;
use fabula_core::Topic;
use fabula_error::FabulaResult;
use fabula_interface::{AdmissionCheck, InferenceDriver, RunLog, StoryStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

/// Outcome of a single run within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The story was written and persisted
    Completed {
        /// Where the story artifact was written
        path: PathBuf,
        /// Sections in the story
        sections: usize,
    },
    /// The run stopped with an error
    Failed {
        /// Error description
        message: String,
    },
}

/// One entry in a batch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RunRecord {
    /// Position in the batch (0-based)
    run_index: usize,
    /// Topic the run was seeded with
    topic: Topic,
    /// How the run ended
    outcome: RunOutcome,
}

/// Outcomes of every run in a batch, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    runs: Vec<RunRecord>,
}

impl BatchReport {
    /// All run records.
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    /// Number of runs that completed.
    pub fn completed(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| matches!(r.outcome, RunOutcome::Completed { .. }))
            .count()
    }

    /// Number of runs that failed.
    pub fn failed(&self) -> usize {
        self.runs.len() - self.completed()
    }
}

/// Runs batches of stories against one backend, log and store.
pub struct StoryAssembler<D, A, S, L>
where
    D: InferenceDriver,
    A: AdmissionCheck,
    S: StoryStore,
    L: RunLog,
{
    generators: StageGenerators<D, A>,
    pipeline: PipelineConfig,
    batch: BatchConfig,
    store: S,
    log: L,
}

impl<D, A, S, L> StoryAssembler<D, A, S, L>
where
    D: InferenceDriver,
    A: AdmissionCheck,
    S: StoryStore,
    L: RunLog,
{
    /// Creates an assembler.
    pub fn new(
        generators: StageGenerators<D, A>,
        pipeline: PipelineConfig,
        batch: BatchConfig,
        store: S,
        log: L,
    ) -> Self {
        Self {
            generators,
            pipeline,
            batch,
            store,
            log,
        }
    }

    /// Stage generators shared by every run.
    pub fn generators(&self) -> &StageGenerators<D, A> {
        &self.generators
    }

    /// Story store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run log.
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Runs every configured story in order.
    ///
    /// Run failures are recorded in the report and the log; they never stop
    /// the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only if the batch or pipeline configuration is
    /// invalid.
    #[instrument(skip(self))]
    pub async fn run_batch(&self) -> FabulaResult<BatchReport> {
        self.pipeline.validate()?;
        let topics = self.batch.run_topics()?;
        let total = topics.len();
        info!(runs = total, "Starting batch");

        let mut report = BatchReport::default();
        for (run_index, topic) in topics.into_iter().enumerate() {
            let outcome = match self.run_one(run_index, &topic).await {
                Ok((path, run)) => {
                    info!(run = run_index, path = %path.display(), "Run completed");
                    RunOutcome::Completed {
                        path,
                        sections: run.sections().len(),
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    error!(run = run_index, error = %message, "Run failed");
                    if let Err(log_err) = self
                        .log
                        .append(&records::run_failed(run_index, &message))
                        .await
                    {
                        warn!(error = %log_err, "Could not record run failure in log");
                    }
                    self.cool_down(self.batch.fault_cooldown(), "fault").await;
                    RunOutcome::Failed { message }
                }
            };

            let completed = matches!(outcome, RunOutcome::Completed { .. });
            report.runs.push(RunRecord {
                run_index,
                topic,
                outcome,
            });

            if completed && run_index + 1 < total {
                self.cool_down(self.batch.run_cooldown(), "between runs")
                    .await;
            }
        }

        info!(
            completed = report.completed(),
            failed = report.failed(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Writes and persists a single story with a fresh run state.
    ///
    /// # Errors
    ///
    /// Returns an error if logging or persistence fails.
    #[instrument(skip(self, topic), fields(topic = %topic))]
    pub async fn run_one(
        &self,
        run_index: usize,
        topic: &Topic,
    ) -> FabulaResult<(PathBuf, StoryRun)> {
        self.log
            .append(&records::run_started(run_index, topic, Utc::now()))
            .await?;

        let foundation = self
            .generators
            .build_foundation(topic, *self.pipeline.sections())
            .await?;
        self.log
            .append(&records::foundation_complete(foundation.outline()))
            .await?;

        let pipeline = SectionPipeline::new(&self.generators, &self.pipeline);
        let run = pipeline.run(foundation, &self.log).await?;

        let story = run.story().clone().unwrap_or_else(|| run.assembled());
        let path = self.store.persist(run_index, &story).await?;
        self.log.append(&records::story_saved(&path)).await?;

        Ok((path, run))
    }

    async fn cool_down(&self, duration: std::time::Duration, reason: &str) {
        if duration.is_zero() {
            return;
        }
        info!(secs = duration.as_secs(), reason, "Cooling down");
        tokio::time::sleep(duration).await;
    }
}
