mod autopilot;
mod catalog;
mod cli;
mod commands;
mod config;
mod events;
mod hardware;
mod judge;
mod ollama;
mod pipeline;
mod results;
mod score;
mod submit;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };

    match cli.command {
        Command::Run {
            model,
            quiet,
            no_save,
        } => commands::run(&config, &model, quiet, no_save).await,
        Command::Autopilot {
            models,
            token,
            auto_cleanup,
        } => commands::run_autopilot(&config, models, token, auto_cleanup).await,
        Command::Models => commands::list_models(&config).await,
        Command::Pull { name } => commands::pull(&config, &name).await,
        Command::Tasks => {
            commands::print_tasks();
            Ok(())
        }
    }
}
