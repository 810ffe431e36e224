use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "llmark",
    version,
    about = "Benchmark locally hosted language models against a judged task catalog"
)]
pub struct Cli {
    /// Path to a TOML config file. Defaults to ./llmark.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Benchmark one model: speed test, all catalog tasks, judged scores.
    Run {
        /// Model to benchmark, e.g. "llama3:8b".
        #[arg(long)]
        model: String,

        /// Suppress streamed response text; print status lines only.
        #[arg(long)]
        quiet: bool,

        /// Do not write a result JSON file.
        #[arg(long)]
        no_save: bool,
    },

    /// Pull, benchmark, save, and submit a list of models unattended.
    Autopilot {
        /// Comma-separated model names.
        #[arg(long, value_delimiter = ',', required = true)]
        models: Vec<String>,

        /// Submission token.
        #[arg(long, env = "LLMARK_TOKEN", default_value = "", hide_env_values = true)]
        token: String,

        /// Delete each model after its run to reclaim disk space.
        #[arg(long)]
        auto_cleanup: bool,
    },

    /// List models installed on the server.
    Models,

    /// Pull a model onto the server.
    Pull {
        /// Model name, e.g. "llama3:8b".
        name: String,
    },

    /// Print the benchmark task catalog.
    Tasks,
}
