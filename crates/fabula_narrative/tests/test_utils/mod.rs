//! Test utilities for Fabula pipeline tests.
//!
//! Provides a scripted inference backend that recognises the stage of each
//! prompt by its opening line and answers from per-stage scripts.

#![allow(dead_code)]

use async_trait::async_trait;
use fabula_core::{Completion, GenerationOptions, StoryFoundation, Topic};
use fabula_error::{FabulaResult, StoryError, StoryErrorKind};
use fabula_interface::{AdmissionCheck, InferenceDriver, RunLog};
use fabula_narrative::Stage;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

/// Finds the stage whose persona opens `prompt`.
pub fn classify(prompt: &str) -> Option<Stage> {
    Stage::iter().find(|stage| prompt.starts_with(stage.persona()))
}

/// Mock backend with scripted responses per stage.
///
/// Queued responses are consumed first; afterwards the stage default is
/// returned. Every call is recorded with its stage and prompt.
pub struct ScriptedDriver {
    defaults: HashMap<Stage, String>,
    queued: Mutex<HashMap<Stage, VecDeque<String>>>,
    calls: Mutex<Vec<(Stage, String)>>,
}

impl ScriptedDriver {
    /// Every stage answers with a short marker; the critic scores 9.
    pub fn new() -> Self {
        let defaults = Stage::iter()
            .map(|stage| {
                let text = match stage {
                    Stage::SectionCritic => "Strong pacing. Score: 9/10".to_string(),
                    other => format!("{} output", other),
                };
                (stage, text)
            })
            .collect();
        Self {
            defaults,
            queued: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every stage answers with an empty string.
    pub fn silent() -> Self {
        let defaults = Stage::iter().map(|stage| (stage, String::new())).collect();
        Self {
            defaults,
            queued: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the default answer for `stage`.
    pub fn answering(mut self, stage: Stage, text: &str) -> Self {
        self.defaults.insert(stage, text.to_string());
        self
    }

    /// Queues answers for `stage`, consumed in order before the default.
    pub fn queue(self, stage: Stage, texts: &[&str]) -> Self {
        self.queued
            .lock()
            .unwrap()
            .entry(stage)
            .or_default()
            .extend(texts.iter().map(|t| t.to_string()));
        self
    }

    /// Number of calls made for `stage`.
    pub fn calls_for(&self, stage: Stage) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stage)
            .count()
    }

    /// Prompts sent for `stage`, in order.
    pub fn prompts_for(&self, stage: Stage) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Stages of every call, in order.
    pub fn stage_sequence(&self) -> Vec<Stage> {
        self.calls.lock().unwrap().iter().map(|(s, _)| *s).collect()
    }
}

#[async_trait]
impl InferenceDriver for ScriptedDriver {
    async fn complete(&self, prompt: &str, _options: &GenerationOptions) -> Completion {
        let Some(stage) = classify(prompt) else {
            panic!("Prompt with unknown persona: {}", prompt);
        };
        self.calls
            .lock()
            .unwrap()
            .push((stage, prompt.to_string()));

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&stage)
            .and_then(VecDeque::pop_front);
        let text = queued.unwrap_or_else(|| self.defaults[&stage].clone());
        Completion::from_response(text)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Admission check that always passes and counts how often it was asked.
#[derive(Debug, Default)]
pub struct CountingAdmission {
    admits: AtomicUsize,
}

impl CountingAdmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admits(&self) -> usize {
        self.admits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdmissionCheck for CountingAdmission {
    async fn admit(&self) {
        self.admits.fetch_add(1, Ordering::SeqCst);
    }
}

/// Run log that rejects the nth append (1-based) and keeps the rest.
pub struct FailingRunLog {
    fail_on: usize,
    appends: AtomicUsize,
    records: Mutex<Vec<String>>,
}

impl FailingRunLog {
    pub fn failing_on(fail_on: usize) -> Self {
        Self {
            fail_on,
            appends: AtomicUsize::new(0),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<String> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RunLog for FailingRunLog {
    async fn append(&self, record: &str) -> FabulaResult<()> {
        let n = self.appends.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on {
            return Err(StoryError::new(StoryErrorKind::LogWrite("disk full".to_string())).into());
        }
        self.records.lock().unwrap().push(record.to_string());
        Ok(())
    }
}

/// Foundation with recognisable fields for prompt assertions.
pub fn test_foundation() -> StoryFoundation {
    StoryFoundation::builder()
        .topic(Topic::new("a lighthouse keeper").unwrap())
        .world("A storm-bound island")
        .characters("Ines, the keeper")
        .theme("Duty against solitude")
        .style("Spare, present tense")
        .outline("1. Storm 2. Wreck 3. Dawn")
        .build()
        .expect("Failed to build test foundation")
}
