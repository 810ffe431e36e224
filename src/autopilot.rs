//! Unattended multi-model loop: make sure the judge is installed, then pull,
//! benchmark, persist, and submit each requested model in turn. A broken
//! model skips to the next one; only a missing judge stops the loop.

use crate::config::Config;
use crate::events::EventSink;
use crate::hardware::{MemoryProbe, SystemSnapshot};
use crate::ollama::OllamaClient;
use crate::pipeline::{CancelToken, Pipeline};
use crate::results::save_result;
use crate::submit::Submitter;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AutopilotOptions {
    pub models: Vec<String>,
    pub token: String,
    /// Delete each test model after its run to reclaim disk space.
    pub auto_cleanup: bool,
}

/// What the loop got through. Returned for reporting; every outcome was
/// already emitted as events while it happened.
#[derive(Debug, Default)]
pub struct AutopilotSummary {
    pub completed: Vec<String>,
    pub skipped: Vec<String>,
    pub submitted: Vec<String>,
}

pub async fn run_autopilot(
    client: &OllamaClient,
    config: &Config,
    probe: Arc<dyn MemoryProbe>,
    snapshot: SystemSnapshot,
    submitter: &dyn Submitter,
    opts: &AutopilotOptions,
    events: EventSink,
    cancel: CancelToken,
) -> Result<AutopilotSummary> {
    // Without the judge nothing can be scored, so this failure is fatal.
    ensure_model(client, &config.judge_model, &events)
        .await
        .with_context(|| format!("Judge model '{}' is not usable", config.judge_model))?;

    let mut summary = AutopilotSummary::default();

    for model in &opts.models {
        if cancel.is_cancelled() {
            events.log("Cancelled: stopping autopilot.");
            break;
        }
        if model == &config.judge_model {
            events.log(format!("Skipping '{model}': it is the judge model."));
            summary.skipped.push(model.clone());
            continue;
        }

        if let Err(e) = ensure_model(client, model, &events).await {
            events.log(format!("Skipping '{model}': {e}"));
            tracing::warn!(model = %model, error = %e, "model unusable, skipping");
            summary.skipped.push(model.clone());
            continue;
        }

        events.log(format!("=== Benchmarking {model} ==="));
        let pipeline = Pipeline::new(
            client.clone(),
            config.clone(),
            Arc::clone(&probe),
            events.clone(),
            cancel.clone(),
        );
        let result = pipeline.run(model, snapshot.clone()).await;

        match save_result(Path::new(&config.results_dir), &result) {
            Ok(path) => events.log(format!("Saved result to {}", path.display())),
            Err(e) => events.log(format!("Could not save result for '{model}': {e}")),
        }

        match submitter.submit(&opts.token, &result) {
            Ok(receipt) => {
                events.log(format!("Submitted '{model}': {receipt}"));
                summary.submitted.push(model.clone());
            }
            Err(e) => events.log(format!("Submission failed for '{model}': {e}")),
        }

        if opts.auto_cleanup {
            match client.delete_model(model).await {
                Ok(()) => events.log(format!("Removed '{model}' after benchmarking.")),
                Err(e) => events.log(format!("Could not remove '{model}': {e}")),
            }
        }

        summary.completed.push(model.clone());
    }

    Ok(summary)
}

/// Make a model locally available, pulling it if necessary.
async fn ensure_model(client: &OllamaClient, model: &str, events: &EventSink) -> Result<()> {
    if client.is_available(model).await? {
        return Ok(());
    }

    events.log(format!("Pulling '{model}'..."));
    let progress_events = events.clone();
    let mut last_percent = None;
    client
        .pull_model(model, |progress| {
            let percent = progress.percent();
            if percent != last_percent {
                last_percent = percent;
                match percent {
                    Some(p) => progress_events.log(format!("Pulling '{model}': {p}%")),
                    None => progress_events.log(format!("Pulling '{model}': {}", progress.status)),
                }
            }
        })
        .await?;
    events.log(format!("Pulled '{model}'."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::NullProbe;
    use crate::results::RunResult;
    use crate::submit::NullSubmitter;
    use std::sync::Mutex;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    struct RecordingSubmitter {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingSubmitter {
        fn new() -> Self {
            RecordingSubmitter {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Submitter for RecordingSubmitter {
        fn submit(&self, _token: &str, result: &RunResult) -> Result<String> {
            self.calls.lock().unwrap().push(result.model.clone());
            Ok("receipt-1".to_string())
        }
    }

    fn test_config(url: &str, results_dir: &Path) -> Config {
        Config {
            ollama_url: url.to_string(),
            sample_interval_ms: 10,
            results_dir: results_dir.to_string_lossy().to_string(),
            ..Config::default()
        }
    }

    fn options(models: &[&str]) -> AutopilotOptions {
        AutopilotOptions {
            models: models.iter().map(|s| s.to_string()).collect(),
            token: "token".to_string(),
            auto_cleanup: false,
        }
    }

    async fn mount_tags(server: &MockServer, models: &[&str]) {
        let entries: Vec<serde_json::Value> = models
            .iter()
            .map(|m| serde_json::json!({"name": m}))
            .collect();
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/tags"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"models": entries})),
            )
            .mount(server)
            .await;
    }

    async fn mount_benchmark_endpoints(server: &MockServer) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/show"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "details": {"quantization_level": "Q4_0"}
            })))
            .mount(server)
            .await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/generate"))
            .and(matchers::body_partial_json(serde_json::json!({"stream": true})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "{\"response\":\"answer\",\"done\":true}\n",
                "application/x-ndjson",
            ))
            .mount(server)
            .await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/generate"))
            .and(matchers::body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "{\"score\": 6, \"issues\": [], \"comment\": \"ok\"}",
                "eval_count": 100,
                "eval_duration": 1_000_000_000u64,
                "done": true
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn missing_judge_is_fatal() {
        let server = MockServer::start().await;
        mount_tags(&server, &[]).await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/pull"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "{\"error\":\"manifest not found\"}\n",
                "application/x-ndjson",
            ))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.uri(), dir.path());
        let client = OllamaClient::with_base_url(server.uri());

        let err = run_autopilot(
            &client,
            &config,
            Arc::new(NullProbe),
            SystemSnapshot::unknown(),
            &NullSubmitter,
            &options(&["llama3:8b"]),
            EventSink::disabled(),
            CancelToken::new(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Judge model"), "{err:#}");
    }

    #[tokio::test]
    async fn unpullable_model_is_skipped_not_fatal() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.uri(), dir.path());
        mount_tags(&server, &[&config.judge_model]).await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/pull"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "{\"error\":\"manifest not found\"}\n",
                "application/x-ndjson",
            ))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(server.uri());
        let summary = run_autopilot(
            &client,
            &config,
            Arc::new(NullProbe),
            SystemSnapshot::unknown(),
            &NullSubmitter,
            &options(&["ghost:latest"]),
            EventSink::disabled(),
            CancelToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.skipped, vec!["ghost:latest"]);
        assert!(summary.completed.is_empty());
    }

    #[tokio::test]
    async fn judge_model_in_the_list_is_skipped() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.uri(), dir.path());
        let judge = config.judge_model.clone();
        mount_tags(&server, &[judge.as_str()]).await;

        let client = OllamaClient::with_base_url(server.uri());
        let summary = run_autopilot(
            &client,
            &config,
            Arc::new(NullProbe),
            SystemSnapshot::unknown(),
            &NullSubmitter,
            &options(&[judge.as_str()]),
            EventSink::disabled(),
            CancelToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.skipped, vec![judge]);
        assert!(summary.completed.is_empty());
    }

    #[tokio::test]
    async fn completed_run_is_saved_and_submitted() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.uri(), dir.path());
        mount_tags(&server, &[config.judge_model.as_str(), "llama3:8b"]).await;
        mount_benchmark_endpoints(&server).await;

        let client = OllamaClient::with_base_url(server.uri());
        let submitter = RecordingSubmitter::new();
        let summary = run_autopilot(
            &client,
            &config,
            Arc::new(NullProbe),
            SystemSnapshot::unknown(),
            &submitter,
            &options(&["llama3:8b"]),
            EventSink::disabled(),
            CancelToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.completed, vec!["llama3:8b"]);
        assert_eq!(summary.submitted, vec!["llama3:8b"]);
        assert_eq!(*submitter.calls.lock().unwrap(), vec!["llama3:8b"]);

        let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn submission_failure_does_not_stop_the_loop() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.uri(), dir.path());
        mount_tags(&server, &[config.judge_model.as_str(), "a:1", "b:1"]).await;
        mount_benchmark_endpoints(&server).await;

        let client = OllamaClient::with_base_url(server.uri());
        let summary = run_autopilot(
            &client,
            &config,
            Arc::new(NullProbe),
            SystemSnapshot::unknown(),
            &NullSubmitter,
            &options(&["a:1", "b:1"]),
            EventSink::disabled(),
            CancelToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.completed, vec!["a:1", "b:1"]);
        assert!(summary.submitted.is_empty());
    }

    #[tokio::test]
    async fn auto_cleanup_deletes_the_model_afterwards() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&server.uri(), dir.path());
        mount_tags(&server, &[config.judge_model.as_str(), "llama3:8b"]).await;
        mount_benchmark_endpoints(&server).await;
        Mock::given(matchers::method("DELETE"))
            .and(matchers::path("/delete"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(server.uri());
        let opts = AutopilotOptions {
            auto_cleanup: true,
            ..options(&["llama3:8b"])
        };
        run_autopilot(
            &client,
            &config,
            Arc::new(NullProbe),
            SystemSnapshot::unknown(),
            &NullSubmitter,
            &opts,
            EventSink::disabled(),
            CancelToken::new(),
        )
        .await
        .unwrap();
    }
}
