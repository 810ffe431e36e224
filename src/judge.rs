//! LLM-as-judge evaluation: builds the grading prompt for one task, calls the
//! fixed judge model with deterministic sampling, and parses a structured
//! verdict out of its free-text output. Every failure path degrades to a
//! minimal-score verdict; a judge problem never aborts a run.

use crate::catalog::{GroundTruth, TaskDefinition};
use crate::config::Config;
use crate::ollama::{GenerateOptions, OllamaClient};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const JUDGE_SYSTEM_PROMPT: &str = "You are a strict but fair benchmark judge. \
Evaluate objectively based on the criteria. Give a score from 1-10 where 10 is perfect. \
Output ONLY JSON.";

const RUBRIC: &str = "Return ONLY a JSON object:\n\
{\n\
  \"score\": number (1-10, where 10 is perfect),\n\
  \"issues\": [...],\n\
  \"comment\": \"short summary with score explanation\"\n\
}\n\n\
Score guide:\n\
10: Perfect, meets all criteria\n\
8-9: Very good, minor issues\n\
6-7: Good, some issues\n\
4-5: Average, multiple issues\n\
2-3: Poor, many issues\n\
1: Very poor or incomplete";

/// The judge's structured output for one task response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    /// 1-10 when the judge ran; clamped, never missing.
    pub score: u8,
    pub issues: Vec<String>,
    pub comment: String,
    /// Unparsed judge output, kept for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Grade one candidate response. Deterministic sampling (temperature 0,
/// top-p 1), never streamed.
pub async fn judge_response(
    client: &OllamaClient,
    config: &Config,
    task: &TaskDefinition,
    candidate_text: &str,
) -> JudgeVerdict {
    let prompt = build_judge_prompt(task, candidate_text);
    let options = GenerateOptions {
        temperature: Some(0.0),
        top_p: Some(1.0),
        num_ctx: None,
    };

    match client
        .generate(
            &config.judge_model,
            &prompt,
            Some(JUDGE_SYSTEM_PROMPT),
            Some(&options),
        )
        .await
    {
        Ok(res) => verdict_from_raw(&res.response),
        Err(e) => JudgeVerdict {
            score: 1,
            issues: vec![format!("Judge call failed: {e}")],
            comment: "Judge call failed, minimal score assigned".to_string(),
            raw: None,
        },
    }
}

pub fn build_judge_prompt(task: &TaskDefinition, candidate_text: &str) -> String {
    format!(
        "Benchmark: {id}\nTask: {desc}\n\nFacts / Truths:\n{facts}\n\n\
         Model Answer:\n---\n{answer}\n---\n\n\
         Evaluation Criteria:\n{criteria}\n\n{rubric}",
        id = task.id,
        desc = task.task_desc,
        facts = render_facts(&task.ground_truth),
        answer = candidate_text,
        criteria = task.criteria,
        rubric = RUBRIC,
    )
}

/// Render the ground-truth section of the grading prompt.
pub fn render_facts(ground_truth: &GroundTruth) -> String {
    match ground_truth {
        GroundTruth::Statements(pairs) => pairs
            .iter()
            .enumerate()
            .map(|(i, (statement, truth))| {
                format!(
                    "{}. {} => {}",
                    i + 1,
                    statement,
                    if *truth { "CORRECT" } else { "INCORRECT" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        GroundTruth::Facts(facts) => facts
            .iter()
            .enumerate()
            .map(|(i, fact)| format!("{}. {}", i + 1, fact))
            .collect::<Vec<_>>()
            .join("\n"),
        GroundTruth::None => "Facts: none".to_string(),
    }
}

/// Best-effort extraction of the first `{...}` JSON object from LLM output.
/// Tries a greedy dotall brace scan, then falls back to slicing between the
/// first `{` and the last `}`. The fallback order is load-bearing: downstream
/// scoring depends on it.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    if let Ok(re) = Regex::new(r"(?s)\{.*\}") {
        if let Some(m) = re.find(raw) {
            return Some(m.as_str());
        }
    }
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Parse the judge's raw output into a verdict. Parse failures degrade to
/// score 1 with a diagnostic issue and a 200-char preview of the raw text.
pub fn verdict_from_raw(raw: &str) -> JudgeVerdict {
    let Some(json_text) = extract_json_object(raw) else {
        return parse_failure("no JSON object found", raw);
    };

    let value: serde_json::Value = match serde_json::from_str(json_text) {
        Ok(v) => v,
        Err(e) => return parse_failure(&e.to_string(), raw),
    };

    let score_f = score_value(&value);
    let score = (score_f.round() as i64).clamp(1, 10) as u8;

    let issues = value
        .get("issues")
        .and_then(|i| i.as_array())
        .map(|arr| {
            arr.iter()
                .map(|x| match x.as_str() {
                    Some(s) => s.to_string(),
                    None => x.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let comment = value
        .get("comment")
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Score: {score}/10"));

    JudgeVerdict {
        score,
        issues,
        comment,
        raw: Some(raw.to_string()),
    }
}

// A missing or unusable score key defaults to 1 before clamping. Numeric
// strings are coerced the way the judge models tend to emit them.
fn score_value(value: &serde_json::Value) -> f64 {
    match value.get("score") {
        Some(v) => v
            .as_f64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
            .unwrap_or(1.0),
        None => 1.0,
    }
}

fn parse_failure(reason: &str, raw: &str) -> JudgeVerdict {
    let preview: String = raw.chars().take(200).collect();
    JudgeVerdict {
        score: 1,
        issues: vec![format!("Judge JSON parse error: {reason}"), preview],
        comment: "JSON parse error, minimal score assigned".to_string(),
        raw: Some(raw.to_string()),
    }
}
