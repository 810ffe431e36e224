use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api";
pub const DEFAULT_JUDGE_MODEL: &str = "qwen2.5:14b-instruct";

const CONFIG_FILE: &str = "llmark.toml";

/// Runtime configuration, constructed once and passed by reference into the
/// client and pipeline. Nothing reads ambient process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Ollama HTTP API.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Model used to grade responses. Never benchmarked itself.
    #[serde(default = "default_judge_model")]
    pub judge_model: String,

    /// Optional context window override (`num_ctx`) for test-model generations.
    #[serde(default)]
    pub context_window: Option<u64>,

    /// Interval between accelerator memory samples, in milliseconds.
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    /// Directory where result JSON files are written.
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
}

fn default_ollama_url() -> String {
    DEFAULT_OLLAMA_URL.to_string()
}

fn default_judge_model() -> String {
    DEFAULT_JUDGE_MODEL.to_string()
}

fn default_sample_interval_ms() -> u64 {
    500
}

fn default_results_dir() -> String {
    "results".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ollama_url: default_ollama_url(),
            judge_model: default_judge_model(),
            context_window: None,
            sample_interval_ms: default_sample_interval_ms(),
            results_dir: default_results_dir(),
        }
    }
}

impl Config {
    /// Load `llmark.toml` from the working directory, falling back to
    /// defaults if the file is absent or unreadable.
    pub fn load_or_default() -> Self {
        let config_path = Path::new(CONFIG_FILE);

        if config_path.exists() {
            match Self::load(config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("failed to load {}: {:#}", CONFIG_FILE, e);
                    tracing::warn!("using default configuration");
                }
            }
        }

        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.ollama_url, DEFAULT_OLLAMA_URL);
        assert_eq!(config.judge_model, DEFAULT_JUDGE_MODEL);
        assert_eq!(config.context_window, None);
        assert_eq!(config.sample_interval_ms, 500);
    }

    #[test]
    fn loads_partial_toml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llmark.toml");
        fs::write(&path, "judge_model = \"llama3:8b\"\ncontext_window = 8192\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.judge_model, "llama3:8b");
        assert_eq!(config.context_window, Some(8192));
        assert_eq!(config.ollama_url, DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llmark.toml");
        fs::write(&path, "judge_model = [not toml").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to parse"));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&text).unwrap();
        assert_eq!(loaded.ollama_url, config.ollama_url);
        assert_eq!(loaded.results_dir, config.results_dir);
    }
}
