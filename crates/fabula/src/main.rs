//! Fabula - long-form fiction with a local language model.

use clap::Parser;
use fabula::{
    Cli, Commands, FabulaConfig, RunOverrides, handle_check, handle_draft, handle_export,
    handle_run,
};
use fabula_core::init_observability;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_observability(&cli.log_level, cli.json_logs).map_err(anyhow::Error::msg)?;
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "Loaded .env file");
    }

    let config = FabulaConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Run(args) => {
            info!("Starting fabula run");
            let report = handle_run(config, &RunOverrides::from(args)).await?;
            if report.completed() == 0 {
                anyhow::bail!("No story in the batch completed");
            }
        }
        Commands::Draft(args) => {
            handle_draft(config, args).await?;
        }
        Commands::Export(args) => {
            handle_export(config, args).await?;
        }
        Commands::Check => {
            handle_check(config).await?;
        }
    }

    Ok(())
}
