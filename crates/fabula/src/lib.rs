//! Fabula command-line application.
//!
//! Wires the story pipeline to the Ollama backend, the host-load throttle and
//! file-backed sinks, and adds draft mode and Markdown export.

mod cli;
mod commands;
mod config;
mod export;

pub use cli::{Cli, Commands, DraftArgs, ExportArgs, RunArgs};
pub use commands::{DRAFT_FILE_NAME, handle_check, handle_draft, handle_export, handle_run};
pub use config::{ENV_PREFIX, ENV_SEPARATOR, FabulaConfig, RunOverrides, default_config_path};
pub use export::{ExportConfig, export_story, is_chapter_heading, render_markdown};
