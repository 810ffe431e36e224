//! HTTP client for the Ollama API: generation (streamed and not), model
//! listing, installation, inspection, and removal.

use crate::config::Config;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed stream payload: {0}")]
    Stream(String),
    #[error("model pull failed: {0}")]
    Pull(String),
}

/// Sampling and context options forwarded in the `options` field of a
/// generate request. Absent fields keep the server's defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ctx: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Generation duration in nanoseconds, as reported by the server.
    #[serde(default)]
    pub eval_duration: Option<u64>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullProgress {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub completed: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PullProgress {
    pub fn percent(&self) -> Option<u8> {
        match (self.completed, self.total) {
            (Some(done), Some(total)) if total > 0 => {
                Some(((done as f64 / total as f64) * 100.0) as u8)
            }
            _ => None,
        }
    }
}

/// Raw `/show` payload. The server's shapes vary between model families, so
/// the sections stay as loose JSON and are picked apart leniently downstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowResponse {
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default)]
    pub model_info: serde_json::Value,
    #[serde(default)]
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TaggedModel>,
}

#[derive(Debug, Clone, Deserialize)]
struct TaggedModel {
    name: String,
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config.ollama_url.clone())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        OllamaClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Issue a non-streamed generation request and wait for the full response.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: Option<&str>,
        options: Option<&GenerateOptions>,
    ) -> Result<GenerateResponse, OllamaError> {
        let url = self.url("generate");
        let mut payload = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
        });
        if let Some(system) = system {
            payload["system"] = serde_json::Value::String(system.to_string());
        }
        if let Some(options) = options {
            payload["options"] = serde_json::to_value(options)
                .map_err(|e| OllamaError::Stream(e.to_string()))?;
        }

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|source| OllamaError::Transport { url, source })
    }

    /// Issue a streamed generation request. Each NDJSON chunk is handed to
    /// `on_chunk`; returning `false` stops consumption (in-flight data is
    /// dropped, the connection is closed). Chunk-level `error` fields are the
    /// callback's business; only transport and framing problems surface here.
    pub async fn generate_stream<F>(
        &self,
        model: &str,
        prompt: &str,
        options: Option<&GenerateOptions>,
        mut on_chunk: F,
    ) -> Result<(), OllamaError>
    where
        F: FnMut(StreamChunk) -> bool,
    {
        let url = self.url("generate");
        let mut payload = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": true,
        });
        if let Some(options) = options {
            payload["options"] = serde_json::to_value(options)
                .map_err(|e| OllamaError::Stream(e.to_string()))?;
        }

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?;
        let mut response = check_status(response).await?;

        let mut buf: Vec<u8> = Vec::new();
        while let Some(bytes) = response
            .chunk()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?
        {
            buf.extend_from_slice(&bytes);
            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                match parse_stream_line(&line)? {
                    Some(chunk) => {
                        let done = chunk.done;
                        if !on_chunk(chunk) || done {
                            return Ok(());
                        }
                    }
                    None => continue,
                }
            }
        }
        if let Some(chunk) = parse_stream_line(&buf)? {
            on_chunk(chunk);
        }
        Ok(())
    }

    pub async fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let url = self.url("tags");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?;
        let response = check_status(response).await?;
        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|source| OllamaError::Transport { url, source })?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    pub async fn is_available(&self, name: &str) -> Result<bool, OllamaError> {
        Ok(self.list_models().await?.iter().any(|m| m == name))
    }

    /// Pull a model, forwarding streamed progress records to `on_progress`.
    /// A chunk carrying an `error` field aborts the pull.
    pub async fn pull_model<F>(&self, name: &str, mut on_progress: F) -> Result<(), OllamaError>
    where
        F: FnMut(PullProgress),
    {
        let url = self.url("pull");
        let payload = serde_json::json!({ "name": name, "stream": true });

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?;
        let mut response = check_status(response).await?;

        let mut buf: Vec<u8> = Vec::new();
        while let Some(bytes) = response
            .chunk()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?
        {
            buf.extend_from_slice(&bytes);
            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                let text = String::from_utf8_lossy(&line);
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                // Malformed progress lines are skipped; the pull itself decides
                // success or failure.
                if let Ok(progress) = serde_json::from_str::<PullProgress>(text) {
                    if let Some(error) = progress.error {
                        return Err(OllamaError::Pull(error));
                    }
                    on_progress(progress);
                }
            }
        }
        Ok(())
    }

    pub async fn show_model(&self, name: &str) -> Result<ShowResponse, OllamaError> {
        let url = self.url("show");
        let payload = serde_json::json!({ "name": name });
        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|source| OllamaError::Transport { url, source })
    }

    pub async fn delete_model(&self, name: &str) -> Result<(), OllamaError> {
        let url = self.url("delete");
        let payload = serde_json::json!({ "name": name });
        let response = self
            .http
            .delete(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|source| OllamaError::Transport {
                url: url.clone(),
                source,
            })?;
        check_status(response).await?;
        Ok(())
    }
}

fn parse_stream_line(line: &[u8]) -> Result<Option<StreamChunk>, OllamaError> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<StreamChunk>(text)
        .map(Some)
        .map_err(|e| {
            let preview: String = text.chars().take(120).collect();
            OllamaError::Stream(format!("{e}: {preview}"))
        })
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OllamaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(OllamaError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn generate_parses_eval_fields() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "hello",
                "eval_count": 500,
                "eval_duration": 2_000_000_000u64,
                "done": true
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(server.uri());
        let res = client.generate("m", "p", None, None).await.unwrap();
        assert_eq!(res.response, "hello");
        assert_eq!(res.eval_count, Some(500));
        assert_eq!(res.eval_duration, Some(2_000_000_000));
        assert!(res.done);
    }

    #[tokio::test]
    async fn generate_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(server.uri());
        let err = client.generate("m", "p", None, None).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("500"), "unexpected error: {msg}");
        assert!(msg.contains("model not loaded"));
    }

    #[tokio::test]
    async fn generate_stream_accumulates_ndjson_chunks() {
        let server = MockServer::start().await;
        let body = concat!(
            "{\"response\":\"Hel\",\"done\":false}\n",
            "{\"response\":\"lo\",\"done\":false}\n",
            "{\"response\":\"\",\"done\":true}\n",
        );
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"),
            )
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(server.uri());
        let mut full = String::new();
        client
            .generate_stream("m", "p", None, |chunk| {
                full.push_str(&chunk.response);
                true
            })
            .await
            .unwrap();
        assert_eq!(full, "Hello");
    }

    #[tokio::test]
    async fn generate_stream_forwards_error_chunks() {
        let server = MockServer::start().await;
        let body = "{\"response\":\"par\",\"done\":false}\n{\"error\":\"out of memory\"}\n";
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"),
            )
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(server.uri());
        let mut seen_error = None;
        client
            .generate_stream("m", "p", None, |chunk| {
                if let Some(e) = chunk.error {
                    seen_error = Some(e);
                    return false;
                }
                true
            })
            .await
            .unwrap();
        assert_eq!(seen_error.as_deref(), Some("out of memory"));
    }

    #[tokio::test]
    async fn list_models_extracts_names() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "llama3:8b"}, {"name": "qwen2.5:14b-instruct"}]
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(server.uri());
        let models = client.list_models().await.unwrap();
        assert_eq!(models, vec!["llama3:8b", "qwen2.5:14b-instruct"]);
        assert!(client.is_available("llama3:8b").await.unwrap());
        assert!(!client.is_available("missing").await.unwrap());
    }

    #[tokio::test]
    async fn pull_model_reports_progress_and_errors() {
        let server = MockServer::start().await;
        let body = concat!(
            "{\"status\":\"pulling manifest\"}\n",
            "{\"status\":\"downloading\",\"total\":100,\"completed\":50}\n",
            "{\"error\":\"manifest not found\"}\n",
        );
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/pull"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"),
            )
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(server.uri());
        let mut updates = Vec::new();
        let err = client
            .pull_model("ghost:latest", |p| updates.push(p.status.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, OllamaError::Pull(ref m) if m == "manifest not found"));
        assert_eq!(updates, vec!["pulling manifest", "downloading"]);
    }

    #[test]
    fn pull_progress_percent() {
        let p = PullProgress {
            total: Some(200),
            completed: Some(50),
            ..Default::default()
        };
        assert_eq!(p.percent(), Some(25));
        assert_eq!(PullProgress::default().percent(), None);
    }
}
