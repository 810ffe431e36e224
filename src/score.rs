//! Category aggregation: mean scoring, min/max stats, and the synthesized
//! summary text. Pure functions; calling them twice on the same input yields
//! identical output.

use crate::results::{CategoryResult, CategoryStats, TaskResult};
use std::fmt;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fixed score-band language used in category summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl ScoreBand {
    pub fn from_average(average: f64) -> Self {
        if average >= 9.0 {
            ScoreBand::Excellent
        } else if average >= 7.0 {
            ScoreBand::Good
        } else if average >= 5.0 {
            ScoreBand::Acceptable
        } else {
            ScoreBand::Poor
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::Excellent => write!(f, "Excellent"),
            ScoreBand::Good => write!(f, "Good"),
            ScoreBand::Acceptable => write!(f, "Acceptable"),
            ScoreBand::Poor => write!(f, "Poor"),
        }
    }
}

/// Aggregate the judged tasks of one category. The average is recomputed
/// from the task scores on every call; nothing is cached.
pub fn aggregate_category(letter: char, name: &str, tasks: &[TaskResult]) -> CategoryResult {
    let count = tasks.len();
    let mean = if count == 0 {
        0.0
    } else {
        tasks.iter().map(|t| f64::from(t.score)).sum::<f64>() / count as f64
    };
    let score = round2(mean);

    let min = tasks.iter().map(|t| t.score).min().unwrap_or(0);
    let max = tasks.iter().map(|t| t.score).max().unwrap_or(0);

    CategoryResult {
        id: letter.to_string(),
        name: name.to_string(),
        score,
        comment: synthesize_summary(score, tasks),
        tasks: tasks.to_vec(),
        stats: CategoryStats { min, max, count },
    }
}

/// Build the human-readable category summary: band language, a callout of
/// the worst task (its first issue, or its comment when it reported none),
/// and a callout of the best task when distinct and scoring 9 or above.
fn synthesize_summary(average: f64, tasks: &[TaskResult]) -> String {
    let band = ScoreBand::from_average(average);
    let mut summary = format!(
        "{}: average {:.2}/10 across {} task{}.",
        band,
        average,
        tasks.len(),
        if tasks.len() == 1 { "" } else { "s" }
    );

    let worst = tasks.iter().min_by_key(|t| t.score);
    let best = tasks.iter().max_by_key(|t| t.score);

    if let Some(worst) = worst {
        let callout = worst
            .issues
            .first()
            .cloned()
            .unwrap_or_else(|| worst.comment.clone());
        summary.push_str(&format!(
            " Weakest: {} ({}/10) - {}",
            worst.id, worst.score, callout
        ));
    }

    if let (Some(best), Some(worst)) = (best, worst) {
        if best.id != worst.id && best.score >= 9 {
            summary.push_str(&format!(
                " Strongest: {} ({}/10).",
                best.id, best.score
            ));
        }
    }

    summary
}
