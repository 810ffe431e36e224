//! Benchmark pipeline for one model: speed test, streamed generation of every
//! catalog task, sequential judging, per-category aggregation, final result
//! assembly. Phases run strictly in that order; a single task failure never
//! aborts the batch.

use crate::catalog::{self, TaskDefinition, SPEED_CATEGORY};
use crate::config::Config;
use crate::events::{EventSink, RunEvent};
use crate::hardware::{MemoryProbe, MemorySampler, SystemSnapshot};
use crate::judge;
use crate::ollama::{GenerateOptions, OllamaClient};
use crate::results::{
    BenchmarkEntry, ModelDetails, RunResult, SpeedDetails, SpeedResult, TaskResult, Telemetry,
    BENCHMARK_VERSION, JSON_FORMAT_VERSION,
};
use crate::score::{aggregate_category, round2};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const SPEED_PROMPT: &str =
    "Write the numbers from one to one thousand in English words without explanations.";

const SPEED_NAME: &str = "Velocity/Speed";

/// Floor for wall-clock speed measurements, guarding the division.
const MIN_ELAPSED_SECS: f64 = 1e-9;

/// Cooperative cancellation handle. Checked at the top of every per-task loop
/// and inside the chunk-consumption loop; in-flight network calls are allowed
/// to finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SpeedTest,
    Generating,
    Judging,
    Aggregating,
    Done,
    Cancelling,
}

struct GenerationOutcome {
    task: &'static TaskDefinition,
    response: String,
    error: Option<String>,
    telemetry: Telemetry,
}

pub struct Pipeline {
    client: OllamaClient,
    config: Config,
    probe: Arc<dyn MemoryProbe>,
    events: EventSink,
    cancel: CancelToken,
}

impl Pipeline {
    pub fn new(
        client: OllamaClient,
        config: Config,
        probe: Arc<dyn MemoryProbe>,
        events: EventSink,
        cancel: CancelToken,
    ) -> Self {
        Pipeline {
            client,
            config,
            probe,
            events,
            cancel,
        }
    }

    /// Run the full benchmark for one model. Always returns a complete,
    /// inspectable result; per-task failures are folded into it.
    pub async fn run(&self, test_model: &str, snapshot: SystemSnapshot) -> RunResult {
        // Setup guard: the judge must never be benchmarked as a test subject.
        // Short-circuits before any network call.
        if test_model == self.config.judge_model {
            self.events
                .log("Refusing to benchmark the judge model itself.");
            let result = self.refusal_result(test_model, snapshot);
            self.events
                .emit(RunEvent::RunFinished(Box::new(result.clone())));
            return result;
        }

        let mut result = RunResult {
            model: test_model.to_string(),
            date: snapshot.date_utc.clone(),
            system: snapshot,
            judge_model: self.config.judge_model.clone(),
            benchmark_version: BENCHMARK_VERSION.to_string(),
            json_format_version: JSON_FORMAT_VERSION.to_string(),
            model_details: ModelDetails::default(),
            model_estimated_vram_usage_mb: 0.0,
            benchmarks: Vec::new(),
            total_score: 0.0,
        };

        // Cancellation gates every phase, the speed test included: once the
        // flag is set no new network call is made.
        if self.cancel.is_cancelled() {
            self.events.log("Cancelled: skipping speed test.");
        } else {
            match self.client.show_model(test_model).await {
                Ok(show) => result.model_details = ModelDetails::from_show(&show),
                Err(e) => self
                    .events
                    .log(format!("Could not fetch model details: {e}")),
            }

            self.transition(Phase::SpeedTest);
            let (speed, avg_vram) = self.run_speed(test_model).await;
            result.model_estimated_vram_usage_mb = avg_vram;
            self.events.emit(RunEvent::SpeedFinished(speed.clone()));
            result.benchmarks.push(BenchmarkEntry::Speed(speed));
        }

        self.transition(Phase::Generating);
        let outcomes = self.run_generation(test_model).await;

        self.transition(Phase::Judging);
        let task_results = self.run_judging(&outcomes).await;

        self.transition(Phase::Aggregating);
        for letter in catalog::CATEGORY_LETTERS {
            let tasks: Vec<TaskResult> = task_results
                .iter()
                .filter(|t| t.id.starts_with(letter))
                .cloned()
                .collect();
            if tasks.is_empty() {
                continue;
            }
            let name = catalog::category_name(letter).unwrap_or("Unknown");
            let category = aggregate_category(letter, name, &tasks);
            self.events
                .emit(RunEvent::CategoryFinished(category.clone()));
            result.benchmarks.push(BenchmarkEntry::Category(category));
        }

        result.total_score = round2(
            result
                .benchmarks
                .iter()
                .filter_map(BenchmarkEntry::quality_score)
                .sum(),
        );

        self.transition(if self.cancel.is_cancelled() {
            Phase::Cancelling
        } else {
            Phase::Done
        });
        self.events
            .emit(RunEvent::RunFinished(Box::new(result.clone())));
        result
    }

    fn transition(&self, phase: Phase) {
        let label = match phase {
            Phase::SpeedTest => "speed test",
            Phase::Generating => "generation",
            Phase::Judging => "judging",
            Phase::Aggregating => "aggregation",
            Phase::Done => "done",
            Phase::Cancelling => "cancelling",
        };
        tracing::debug!(phase = label, "pipeline phase");
        self.events.log(format!("--- Phase: {label} ---"));
    }

    fn generation_options(&self) -> GenerateOptions {
        GenerateOptions {
            temperature: None,
            top_p: None,
            num_ctx: self.config.context_window,
        }
    }

    /// One untimed warmup (failures ignored), then one timed generation of a
    /// fixed long-form prompt. Throughput prefers the server-reported eval
    /// duration over wall clock.
    async fn run_speed(&self, test_model: &str) -> (SpeedResult, f64) {
        let speed_id = SPEED_CATEGORY.to_string();
        let options = self.generation_options();

        let mut sampler = MemorySampler::start(
            Arc::clone(&self.probe),
            Duration::from_millis(self.config.sample_interval_ms),
            self.events.clone(),
        );

        self.events.status(&speed_id, "Warmup (speed)...");
        let _ = self
            .client
            .generate(test_model, SPEED_PROMPT, None, Some(&options))
            .await;

        self.events.status(&speed_id, "Measuring speed...");
        let started = Instant::now();
        let response = self
            .client
            .generate(test_model, SPEED_PROMPT, None, Some(&options))
            .await;
        let elapsed = started.elapsed().as_secs_f64().max(MIN_ELAPSED_SECS);

        let reading = sampler.stop();
        let telemetry: Telemetry = reading.clone().into();

        let speed = match response {
            Ok(res) => {
                let tokens = res
                    .eval_count
                    .unwrap_or_else(|| res.response.split_whitespace().count() as u64);
                let tps = match res.eval_duration {
                    Some(ns) if ns > 0 => tokens as f64 / ns as f64 * 1_000_000_000.0,
                    _ => tokens as f64 / elapsed,
                };
                SpeedResult {
                    id: speed_id,
                    name: SPEED_NAME.to_string(),
                    score: round2(tps),
                    comment: format!("{} tokens/sec", round2(tps)),
                    details: SpeedDetails {
                        tokens,
                        total_time_s: (elapsed * 1000.0).round() / 1000.0,
                        tokens_per_sec: round2(tps),
                    },
                    metrics: telemetry,
                }
            }
            Err(e) => SpeedResult {
                id: speed_id,
                name: SPEED_NAME.to_string(),
                score: 0.0,
                comment: format!("Speed test failed: {e}"),
                details: SpeedDetails {
                    tokens: 0,
                    total_time_s: 0.0,
                    tokens_per_sec: 0.0,
                },
                metrics: telemetry,
            },
        };

        (speed, reading.average_mb)
    }

    /// Stream every catalog task, one at a time, with a memory sampler per
    /// task. Errors are recorded on the task and the batch continues.
    async fn run_generation(&self, test_model: &str) -> Vec<GenerationOutcome> {
        let options = self.generation_options();
        let mut outcomes = Vec::new();

        for task in catalog::tasks() {
            if self.cancel.is_cancelled() {
                self.events.log("Cancelled: stopping generation.");
                break;
            }
            let id = task.id.to_string();
            self.events.status(&id, "Generating response...");

            let mut sampler = MemorySampler::start(
                Arc::clone(&self.probe),
                Duration::from_millis(self.config.sample_interval_ms),
                self.events.clone(),
            );

            let mut full = String::new();
            let mut error: Option<String> = None;
            let events = self.events.clone();
            let cancel = self.cancel.clone();
            let chunk_id = id.clone();

            let stream_result = self
                .client
                .generate_stream(test_model, task.prompt, Some(&options), |chunk| {
                    if cancel.is_cancelled() {
                        return false;
                    }
                    if let Some(e) = chunk.error {
                        error = Some(e);
                        return false;
                    }
                    if !chunk.response.is_empty() {
                        events.emit(RunEvent::StreamChunk {
                            id: chunk_id.clone(),
                            text: chunk.response.clone(),
                        });
                        full.push_str(&chunk.response);
                    }
                    true
                })
                .await;

            if let Err(e) = stream_result {
                error.get_or_insert(e.to_string());
            }

            let telemetry: Telemetry = sampler.stop().into();

            if let Some(e) = &error {
                self.events.status(&id, format!("Generation failed: {e}"));
            } else {
                self.events.status(&id, "Generation complete.");
            }

            outcomes.push(GenerationOutcome {
                task,
                response: full,
                error,
                telemetry,
            });
        }

        outcomes
    }

    /// Judge each generated response in order. Tasks whose generation failed
    /// get a synthesized zero-score verdict instead of a judge call.
    async fn run_judging(&self, outcomes: &[GenerationOutcome]) -> Vec<TaskResult> {
        let mut task_results = Vec::new();

        for outcome in outcomes {
            if self.cancel.is_cancelled() {
                self.events.log("Cancelled: stopping judging.");
                break;
            }
            let id = outcome.task.id.to_string();

            let task_result = match &outcome.error {
                Some(e) => TaskResult {
                    id: id.clone(),
                    score: 0,
                    comment: format!("Generation error: {e}"),
                    issues: vec![e.clone()],
                    judge_raw: None,
                    metrics: Some(outcome.telemetry.clone()),
                },
                None => {
                    self.events.status(&id, "Waiting for judge...");
                    let verdict = judge::judge_response(
                        &self.client,
                        &self.config,
                        outcome.task,
                        &outcome.response,
                    )
                    .await;
                    TaskResult {
                        id: id.clone(),
                        score: verdict.score,
                        comment: verdict.comment,
                        issues: verdict.issues,
                        judge_raw: verdict.raw,
                        metrics: Some(outcome.telemetry.clone()),
                    }
                }
            };

            self.events
                .status(&id, format!("Judged: {}/10", task_result.score));
            task_results.push(task_result);
        }

        task_results
    }

    /// Zero-score result for the judge-equals-test-model setup error. Every
    /// category is present and explained; nothing was executed.
    fn refusal_result(&self, test_model: &str, snapshot: SystemSnapshot) -> RunResult {
        const REASON: &str = "Test model must not equal judge model";

        let benchmarks = catalog::CATEGORY_LETTERS
            .iter()
            .map(|&letter| {
                let tasks: Vec<TaskResult> = (1..=catalog::TASKS_PER_CATEGORY)
                    .map(|index| TaskResult {
                        id: format!("{letter}{index}"),
                        score: 0,
                        comment: REASON.to_string(),
                        issues: vec![REASON.to_string()],
                        judge_raw: None,
                        metrics: None,
                    })
                    .collect();
                let name = catalog::category_name(letter).unwrap_or("Unknown");
                BenchmarkEntry::Category(aggregate_category(letter, name, &tasks))
            })
            .collect();

        RunResult {
            model: test_model.to_string(),
            date: snapshot.date_utc.clone(),
            system: snapshot,
            judge_model: self.config.judge_model.clone(),
            benchmark_version: BENCHMARK_VERSION.to_string(),
            json_format_version: JSON_FORMAT_VERSION.to_string(),
            model_details: ModelDetails::default(),
            model_estimated_vram_usage_mb: 0.0,
            benchmarks,
            total_score: 0.0,
        }
    }
}
