//! Maktaba CLI
//!
//! Command-line interface for querying the Maktaba search index.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use maktaba_cli::MaktabaConfig;
use maktaba_cli::cli::{Cli, Command};
use maktaba_cli::config_handlers::handle_config_command;
use maktaba_cli::search_handlers::cmd_search;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "info,maktaba=debug,maktaba_search=debug,maktaba_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Search(args) => {
            let config = MaktabaConfig::load(cli.config.as_deref())?;
            tracing::debug!(domain = args.domain, "running search");
            cmd_search(config, &args).await?;
        }
        Command::Config { action } => {
            handle_config_command(cli.config.as_deref(), action)?;
        }
    }
    Ok(())
}
