//! Command handlers.

use crate::{DraftArgs, ExportArgs, ExportConfig, FabulaConfig, RunOverrides, export_story};
use fabula_error::{FabulaResult, StorageError};
use fabula_models::OllamaClient;
use fabula_narrative::{
    BatchReport, FileRunLog, FileStoryStore, RunOutcome, StageGenerators, StoryAssembler,
    draft_story,
};
use fabula_core::Topic;
use fabula_rate_limit::LoadThrottle;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// File name used by draft mode when no output is given.
pub const DRAFT_FILE_NAME: &str = "story_final.txt";

fn generators(config: &FabulaConfig) -> FabulaResult<StageGenerators<OllamaClient, LoadThrottle>> {
    let client = OllamaClient::new(config.backend().clone())?;
    let throttle = LoadThrottle::new(config.throttle().clone());
    Ok(StageGenerators::with_options(
        client,
        throttle,
        config.pipeline().stage_options().clone(),
    ))
}

/// Runs the configured batch and prints a summary line per run.
#[instrument(skip_all)]
pub async fn handle_run(config: FabulaConfig, overrides: &RunOverrides) -> FabulaResult<BatchReport> {
    let config = config.with_overrides(overrides);
    config.validate()?;

    let batch = config.batch().clone();
    let assembler = StoryAssembler::new(
        generators(&config)?,
        config.pipeline().clone(),
        batch.clone(),
        FileStoryStore::new(batch.output_dir()),
        FileRunLog::new(batch.log_path()),
    );

    info!(
        model = %config.backend().model(),
        sections = *config.pipeline().sections(),
        log = %batch.log_path().display(),
        "Starting story batch"
    );
    let report = assembler.run_batch().await?;

    for run in report.runs() {
        match run.outcome() {
            RunOutcome::Completed { path, sections } => println!(
                "Run {} ({}): {} sections -> {}",
                run.run_index() + 1,
                run.topic(),
                sections,
                path.display()
            ),
            RunOutcome::Failed { message } => println!(
                "Run {} ({}): failed: {}",
                run.run_index() + 1,
                run.topic(),
                message
            ),
        }
    }
    println!(
        "{} completed, {} failed",
        report.completed(),
        report.failed()
    );

    Ok(report)
}

/// Writes, critiques and rewrites one short story.
#[instrument(skip_all, fields(topic = %args.topic))]
pub async fn handle_draft(config: FabulaConfig, args: &DraftArgs) -> FabulaResult<PathBuf> {
    let overrides = RunOverrides {
        model: args.model.clone(),
        ..RunOverrides::default()
    };
    let config = config.with_overrides(&overrides);
    let topic = Topic::new(args.topic.as_str())?;

    let generators = generators(&config)?;
    let draft = draft_story(&generators, &topic, args.words).await;

    if draft.story().is_empty() {
        warn!("Rewrite came back empty");
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| config.batch().output_dir().join(DRAFT_FILE_NAME));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(StorageError::from)?;
    }
    tokio::fs::write(&path, draft.story())
        .await
        .map_err(StorageError::from)?;

    println!("Critique score: {}/10", draft.critique().score());
    println!("Story saved to {}", path.display());
    Ok(path)
}

/// Renders a story artifact to Markdown.
pub async fn handle_export(config: FabulaConfig, args: &ExportArgs) -> FabulaResult<PathBuf> {
    let export = ExportConfig::new(
        args.title.clone().or_else(|| config.export().title().clone()),
        args.author.clone().or_else(|| config.export().author().clone()),
    );
    let path = export_story(&args.input, args.output.as_deref(), &export).await?;
    println!("Exported to {}", path.display());
    Ok(path)
}

/// Pings the backend.
pub async fn handle_check(config: FabulaConfig) -> FabulaResult<()> {
    let client = OllamaClient::new(config.backend().clone())?;
    client.ping().await?;
    println!(
        "Backend reachable at {} (model {})",
        config.backend().base_url(),
        config.backend().model()
    );
    Ok(())
}
