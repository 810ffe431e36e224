//! Result submission seam. The autopilot hands every finished run to a
//! `Submitter`; what "submitting" means (a results API, a shared directory, a
//! review queue) is the implementation's business.

use crate::results::RunResult;
use anyhow::{bail, Result};

pub trait Submitter: Send + Sync {
    /// Submit one finished run. Returns a short human-readable receipt
    /// (an URL, an id) on success.
    fn submit(&self, token: &str, result: &RunResult) -> Result<String>;
}

/// Placeholder used when no submission backend is configured. Always fails,
/// which the autopilot treats as a non-fatal, logged outcome.
pub struct NullSubmitter;

impl Submitter for NullSubmitter {
    fn submit(&self, _token: &str, _result: &RunResult) -> Result<String> {
        bail!("submission workflow not configured")
    }
}
