//! Result records for one benchmark run and their persisted JSON form.

use crate::hardware::{SamplerReading, SystemSnapshot};
use crate::ollama::ShowResponse;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const BENCHMARK_VERSION: &str = "v1";
pub const JSON_FORMAT_VERSION: &str = "v1";

/// Accelerator telemetry captured while one generation ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub peak_vram_mb: f64,
    pub avg_vram_mb: f64,
    pub gpu_detected: bool,
}

impl From<SamplerReading> for Telemetry {
    fn from(reading: SamplerReading) -> Self {
        Telemetry {
            peak_vram_mb: reading.peak_mb,
            avg_vram_mb: reading.average_mb,
            gpu_detected: reading.gpu_detected(),
        }
    }
}

/// One judged task inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Task identifier, e.g. "B2".
    pub id: String,
    /// 1-10 from the judge; 0 for generation or setup failures.
    pub score: u8,
    pub comment: String,
    #[serde(default)]
    pub issues: Vec<String>,
    /// Raw judge output, kept for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge_raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Telemetry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub min: u8,
    pub max: u8,
    pub count: usize,
}

/// Aggregate of the three judged tasks of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    /// Category letter, e.g. "B".
    pub id: String,
    pub name: String,
    /// Arithmetic mean of the task scores, rounded to 2 decimals.
    pub score: f64,
    /// Synthesized human-readable summary.
    pub comment: String,
    pub tasks: Vec<TaskResult>,
    pub stats: CategoryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedDetails {
    pub tokens: u64,
    pub total_time_s: f64,
    pub tokens_per_sec: f64,
}

/// The per-model throughput measurement. Reported alongside the categories
/// but excluded from the quality total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedResult {
    /// Always "A".
    pub id: String,
    pub name: String,
    /// Tokens per second, rounded to 2 decimals.
    pub score: f64,
    pub comment: String,
    pub details: SpeedDetails,
    #[serde(default)]
    pub metrics: Telemetry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BenchmarkEntry {
    Speed(SpeedResult),
    Category(CategoryResult),
}

impl BenchmarkEntry {
    pub fn quality_score(&self) -> Option<f64> {
        match self {
            BenchmarkEntry::Speed(_) => None,
            BenchmarkEntry::Category(c) => Some(c.score),
        }
    }
}

/// Model metadata reported by `/show`, extracted leniently because the
/// server's shapes differ between model families.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDetails {
    pub quantization: Option<String>,
    pub context_length: Option<u64>,
    pub parameter_size: Option<String>,
    pub family: Option<String>,
}

impl ModelDetails {
    pub fn from_show(show: &ShowResponse) -> Self {
        let details = &show.details;
        let context_length = show
            .model_info
            .as_object()
            .and_then(|info| {
                info.iter()
                    .find(|(k, _)| k.ends_with(".context_length"))
                    .and_then(|(_, v)| v.as_u64())
            })
            .or_else(|| show.parameters.get("num_ctx").and_then(|v| v.as_u64()));

        ModelDetails {
            quantization: details
                .get("quantization_level")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            context_length,
            parameter_size: details
                .get("parameter_size")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            family: details
                .get("family")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }
    }
}

/// One complete benchmark execution for one model. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub model: String,
    pub date: String,
    pub system: SystemSnapshot,
    pub judge_model: String,
    pub benchmark_version: String,
    pub json_format_version: String,
    #[serde(default)]
    pub model_details: ModelDetails,
    #[serde(default)]
    pub model_estimated_vram_usage_mb: f64,
    pub benchmarks: Vec<BenchmarkEntry>,
    /// Sum of category averages; the speed entry does not contribute.
    pub total_score: f64,
}

/// Write one run result as pretty JSON under `dir`, named
/// `<UTC timestamp>_<sanitized model>.json`.
pub fn save_result(dir: &Path, result: &RunResult) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create results directory: {}", dir.display()))?;

    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{}_{}.json", stamp, sanitize_model_name(&result.model)));

    let json = serde_json::to_string_pretty(result).context("Failed to serialize run result")?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write result file: {}", path.display()))?;
    Ok(path)
}

pub fn sanitize_model_name(model: &str) -> String {
    model.replace([':', '/'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_category() -> CategoryResult {
        CategoryResult {
            id: "B".to_string(),
            name: "English Quality".to_string(),
            score: 7.33,
            comment: "Good".to_string(),
            tasks: vec![TaskResult {
                id: "B1".to_string(),
                score: 7,
                comment: "fine".to_string(),
                issues: vec![],
                judge_raw: None,
                metrics: None,
            }],
            stats: CategoryStats {
                min: 7,
                max: 7,
                count: 1,
            },
        }
    }

    fn sample_run() -> RunResult {
        RunResult {
            model: "llama3:8b".to_string(),
            date: "2025-01-01T00:00:00Z".to_string(),
            system: SystemSnapshot::unknown(),
            judge_model: "qwen2.5:14b-instruct".to_string(),
            benchmark_version: BENCHMARK_VERSION.to_string(),
            json_format_version: JSON_FORMAT_VERSION.to_string(),
            model_details: ModelDetails::default(),
            model_estimated_vram_usage_mb: 5120.0,
            benchmarks: vec![
                BenchmarkEntry::Speed(SpeedResult {
                    id: "A".to_string(),
                    name: "Velocity/Speed".to_string(),
                    score: 250.0,
                    comment: "250 tokens/sec".to_string(),
                    details: SpeedDetails {
                        tokens: 500,
                        total_time_s: 2.0,
                        tokens_per_sec: 250.0,
                    },
                    metrics: Telemetry::default(),
                }),
                BenchmarkEntry::Category(sample_category()),
            ],
            total_score: 7.33,
        }
    }

    #[test]
    fn run_result_round_trips_through_json() {
        let run = sample_run();
        let json = serde_json::to_string(&run).unwrap();
        let back: RunResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, run);
        assert!(matches!(back.benchmarks[0], BenchmarkEntry::Speed(_)));
        assert!(matches!(back.benchmarks[1], BenchmarkEntry::Category(_)));
    }

    #[test]
    fn run_result_carries_version_tags() {
        let json = serde_json::to_value(sample_run()).unwrap();
        assert_eq!(json["benchmark_version"], "v1");
        assert_eq!(json["json_format_version"], "v1");
    }

    #[test]
    fn quality_score_excludes_speed() {
        let run = sample_run();
        assert_eq!(run.benchmarks[0].quality_score(), None);
        assert_eq!(run.benchmarks[1].quality_score(), Some(7.33));
    }

    #[test]
    fn save_result_sanitizes_the_filename() {
        let dir = tempfile::tempdir().unwrap();
        let run = RunResult {
            model: "hf.co/org/model:Q4_K_M".to_string(),
            ..sample_run()
        };

        let path = save_result(dir.path(), &run).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("_hf.co-org-model-Q4_K_M.json"), "{name}");

        let text = std::fs::read_to_string(&path).unwrap();
        let back: RunResult = serde_json::from_str(&text).unwrap();
        assert_eq!(back.model, run.model);
    }

    #[test]
    fn model_details_extracted_leniently() {
        let show: ShowResponse = serde_json::from_value(serde_json::json!({
            "details": {
                "quantization_level": "Q4_K_M",
                "parameter_size": "8.0B",
                "family": "llama"
            },
            "model_info": { "llama.context_length": 8192 },
            "parameters": "stop \"<|eot|>\""
        }))
        .unwrap();

        let details = ModelDetails::from_show(&show);
        assert_eq!(details.quantization.as_deref(), Some("Q4_K_M"));
        assert_eq!(details.context_length, Some(8192));
        assert_eq!(details.parameter_size.as_deref(), Some("8.0B"));
        assert_eq!(details.family.as_deref(), Some("llama"));
    }

    #[test]
    fn model_details_tolerate_non_object_sections() {
        let show = ShowResponse::default();
        let details = ModelDetails::from_show(&show);
        assert_eq!(details, ModelDetails::default());
    }

    #[test]
    fn telemetry_from_reading_applies_detection_threshold() {
        let t: Telemetry = SamplerReading {
            peak_mb: 6000.0,
            average_mb: 5500.0,
            samples: 10,
        }
        .into();
        assert!(t.gpu_detected);

        let t: Telemetry = SamplerReading::default().into();
        assert!(!t.gpu_detected);
    }
}
