use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dossier::cli;
use dossier::config::DossierConfig;
use dossier::server;

#[derive(Parser)]
#[command(name = "dossier", version, about = "Lead-memory and context service for sales agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve,
    /// Show store statistics
    Stats,
    /// Load knowledge items from a JSON file
    Seed {
        /// Path to a JSON array of {org_id?, title, content, content_type}
        file: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load config (for log level)
    let config = DossierConfig::load()?;

    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match args.command {
        Command::Serve => server::serve(config).await?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Seed { file } => cli::seed::seed(&config, &file)?,
    }

    Ok(())
}
