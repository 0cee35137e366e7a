//! Command-line structure for the `fabula` binary.

use crate::RunOverrides;
use clap::{Args, Parser, Subcommand};
use fabula_narrative::DRAFT_WORDS;
use std::path::PathBuf;

/// Long-form fiction generation against a local Ollama backend.
#[derive(Parser, Debug)]
#[command(name = "fabula")]
#[command(about = "Write long-form fiction with a local language model")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "FABULA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a batch of long-form stories through the section pipeline
    Run(RunArgs),
    /// Write one short story: draft, critique, rewrite
    Draft(DraftArgs),
    /// Render a story artifact as Markdown
    Export(ExportArgs),
    /// Check that the inference backend is reachable
    Check,
}

/// Arguments for `fabula run`.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Topic to write about (repeat for several); replaces configured topics
    #[arg(short, long = "topic")]
    pub topics: Vec<String>,

    /// Number of sections per story
    #[arg(short, long)]
    pub sections: Option<usize>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Stories per topic
    #[arg(short, long)]
    pub runs: Option<usize>,

    /// Use the long-form pipeline preset
    #[arg(long)]
    pub long_form: bool,
}

impl From<&RunArgs> for RunOverrides {
    fn from(args: &RunArgs) -> Self {
        RunOverrides {
            topics: args.topics.clone(),
            sections: args.sections,
            model: args.model.clone(),
            runs: args.runs,
            long_form: args.long_form,
        }
    }
}

/// Arguments for `fabula draft`.
#[derive(Args, Debug, Clone)]
pub struct DraftArgs {
    /// Topic to write about
    pub topic: String,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Target length in words
    #[arg(short, long, default_value_t = DRAFT_WORDS)]
    pub words: usize,

    /// Output file (defaults to story_final.txt in the output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `fabula export`.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Story artifact to render
    #[arg(short, long)]
    pub input: PathBuf,

    /// Markdown output file (defaults to the input with a .md extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,

    /// Document author
    #[arg(long)]
    pub author: Option<String>,
}
