//! Typed progress stream produced by the pipeline and the autopilot loop.
//! Any consumer (a terminal printer, a test harness, a future GUI) subscribes
//! to the receiving end; the core never talks to a presentation layer
//! directly.

use crate::results::{CategoryResult, RunResult, SpeedResult};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone)]
pub enum RunEvent {
    /// Per-task status line ("Generating response...", "Waiting for judge...").
    TaskStatus { id: String, message: String },
    /// Incremental response text as it streams in.
    StreamChunk { id: String, text: String },
    /// Free-form log line.
    Log(String),
    /// One accelerator memory reading, in MB.
    MemorySample(f64),
    SpeedFinished(SpeedResult),
    CategoryFinished(CategoryResult),
    RunFinished(Box<RunResult>),
}

/// Sending half of the event stream. A disconnected or absent consumer is
/// not an error: the run must finish whether or not anyone is watching.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Option<UnboundedSender<RunEvent>>,
}

impl EventSink {
    pub fn disabled() -> Self {
        EventSink { tx: None }
    }

    pub fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn log(&self, message: impl Into<String>) {
        self.emit(RunEvent::Log(message.into()));
    }

    pub fn status(&self, id: impl Into<String>, message: impl Into<String>) {
        self.emit(RunEvent::TaskStatus {
            id: id.into(),
            message: message.into(),
        });
    }
}

pub fn channel() -> (EventSink, UnboundedReceiver<RunEvent>) {
    let (tx, rx) = unbounded_channel();
    (EventSink { tx: Some(tx) }, rx)
}
