//! Subcommand handlers: wire the config, client, pipeline, and event stream
//! to a plain terminal.

use crate::autopilot::{self, AutopilotOptions};
use crate::catalog;
use crate::config::Config;
use crate::events::{self, RunEvent};
use crate::hardware::{NullProbe, SystemSnapshot};
use crate::ollama::OllamaClient;
use crate::pipeline::{CancelToken, Pipeline};
use crate::results::{save_result, BenchmarkEntry, RunResult};
use crate::submit::NullSubmitter;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub async fn run(config: &Config, model: &str, quiet: bool, no_save: bool) -> Result<()> {
    let client = OllamaClient::new(config);
    let (sink, mut rx) = events::channel();
    let cancel = CancelToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    println!("Benchmarking '{model}' (judge: {})", config.judge_model);

    let pipeline = Pipeline::new(
        client,
        config.clone(),
        Arc::new(NullProbe),
        sink,
        cancel,
    );
    let model_owned = model.to_string();
    let handle = tokio::spawn(async move {
        pipeline
            .run(&model_owned, SystemSnapshot::unknown())
            .await
    });

    let mut streaming = false;
    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::TaskStatus { id, message } => {
                if streaming {
                    println!();
                    streaming = false;
                }
                println!("[{id}] {message}");
            }
            RunEvent::StreamChunk { text, .. } => {
                if !quiet {
                    print!("{text}");
                    let _ = std::io::stdout().flush();
                    streaming = true;
                }
            }
            RunEvent::Log(line) => {
                if streaming {
                    println!();
                    streaming = false;
                }
                println!("{line}");
            }
            RunEvent::SpeedFinished(speed) => {
                println!(
                    "[{}] {} tok/s over {} tokens",
                    speed.id, speed.details.tokens_per_sec, speed.details.tokens
                );
            }
            RunEvent::CategoryFinished(category) => {
                println!(
                    "[{}] {} -> {:.2}/10",
                    category.id, category.name, category.score
                );
            }
            RunEvent::RunFinished(_) => break,
            RunEvent::MemorySample(_) => {}
        }
    }

    let result = handle.await.context("benchmark task failed")?;
    print_summary(&result);

    if !no_save {
        let path = save_result(Path::new(&config.results_dir), &result)?;
        println!("Result saved to {}", path.display());
    }
    Ok(())
}

pub async fn run_autopilot(
    config: &Config,
    models: Vec<String>,
    token: String,
    auto_cleanup: bool,
) -> Result<()> {
    let client = OllamaClient::new(config);
    let (sink, mut rx) = events::channel();
    let cancel = CancelToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                RunEvent::TaskStatus { id, message } => println!("[{id}] {message}"),
                RunEvent::Log(line) => println!("{line}"),
                RunEvent::CategoryFinished(category) => {
                    println!(
                        "[{}] {} -> {:.2}/10",
                        category.id, category.name, category.score
                    );
                }
                RunEvent::RunFinished(result) => {
                    println!(
                        "Finished {}: {:.2} / {:.0}",
                        result.model,
                        result.total_score,
                        catalog::max_total_score()
                    );
                }
                _ => {}
            }
        }
    });

    let summary = autopilot::run_autopilot(
        &client,
        config,
        Arc::new(NullProbe),
        SystemSnapshot::unknown(),
        &NullSubmitter,
        &AutopilotOptions {
            models,
            token,
            auto_cleanup,
        },
        sink,
        cancel,
    )
    .await;
    let _ = printer.await;
    let summary = summary?;

    println!(
        "Autopilot finished: {} completed, {} submitted, {} skipped.",
        summary.completed.len(),
        summary.submitted.len(),
        summary.skipped.len()
    );
    for model in &summary.skipped {
        println!("  skipped: {model}");
    }
    Ok(())
}

pub async fn list_models(config: &Config) -> Result<()> {
    let client = OllamaClient::new(config);
    let models = client
        .list_models()
        .await
        .context("Could not reach the Ollama server")?;

    if models.is_empty() {
        println!("No models installed.");
        return Ok(());
    }
    for model in models {
        println!("{model}");
    }
    Ok(())
}

pub async fn pull(config: &Config, name: &str) -> Result<()> {
    let client = OllamaClient::new(config);
    println!("Pulling '{name}'...");

    let mut last_percent = None;
    client
        .pull_model(name, |progress| {
            let percent = progress.percent();
            if percent != last_percent {
                last_percent = percent;
                match percent {
                    Some(p) => println!("  {p}% ({})", progress.status),
                    None => println!("  {}", progress.status),
                }
            }
        })
        .await
        .with_context(|| format!("Failed to pull '{name}'"))?;

    println!("Done.");
    Ok(())
}

pub fn print_tasks() {
    for &letter in &catalog::CATEGORY_LETTERS {
        let name = catalog::category_name(letter).unwrap_or("Unknown");
        println!("{letter}: {name}");
        for task in catalog::category_tasks(letter) {
            println!("  {}  {}", task.id, task.name);
        }
    }
    println!(
        "\n{} tasks, maximum total score {:.0}.",
        catalog::tasks().len(),
        catalog::max_total_score()
    );
}

fn spawn_ctrl_c_handler(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling after the current task...");
            cancel.cancel();
        }
    });
}

fn print_summary(result: &RunResult) {
    println!("\n=== {} ===", result.model);
    for entry in &result.benchmarks {
        match entry {
            BenchmarkEntry::Speed(speed) => {
                println!(
                    "  {:<3} {:<20} {:>8.2} tok/s",
                    speed.id, speed.name, speed.details.tokens_per_sec
                );
            }
            BenchmarkEntry::Category(category) => {
                println!(
                    "  {:<3} {:<20} {:>8.2}/10   (min {}, max {})",
                    category.id,
                    category.name,
                    category.score,
                    category.stats.min,
                    category.stats.max
                );
            }
        }
    }
    println!(
        "  Total: {:.2} / {:.0}",
        result.total_score,
        catalog::max_total_score()
    );
    if result.model_estimated_vram_usage_mb > 0.0 {
        println!(
            "  Estimated VRAM usage: {:.0} MB",
            result.model_estimated_vram_usage_mb
        );
    }
}
