//! Progress tracking for creation runs
//!
//! The tracker keeps the stage history for the completion report and fans
//! each event out to the registered sinks. Sinks are pure observers: nothing
//! they do feeds back into the run.

use chrono::{DateTime, Utc};
use reno_core::fail_open::fail_open_sync;
use reno_core::RenoError;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::state_machine::Stage;

/// What happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressKind {
    StageStarted,
    StageCompleted { duration_ms: u64 },
    StageFailed { error: String },
    ItemProgress {
        created: usize,
        failed: usize,
        total: usize,
    },
    Finished,
}

/// A timestamped progress notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub label: String,
    pub percent: u8,
    pub kind: ProgressKind,
    pub at: DateTime<Utc>,
}

/// Receiver of progress events
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent);
}

/// Logs every event through `tracing`
#[derive(Debug, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: &ProgressEvent) {
        match &event.kind {
            ProgressKind::StageStarted => {
                info!("[{:>3}%] {}", event.percent, event.label);
            }
            ProgressKind::StageCompleted { duration_ms } => {
                info!(stage = %event.stage, duration_ms, "Stage complete");
            }
            ProgressKind::StageFailed { error } => {
                warn!(stage = %event.stage, "Stage failed: {}", error);
            }
            ProgressKind::ItemProgress {
                created,
                failed,
                total,
            } => {
                info!("Items: {}/{} created, {} failed", created, total, failed);
            }
            ProgressKind::Finished => {
                info!("[100%] {}", event.label);
            }
        }
    }
}

/// Forwards events to an unbounded channel, e.g. for a UI task
pub struct ChannelSink {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: &ProgressEvent) {
        // A dropped receiver must not affect the run
        fail_open_sync("progress_channel", || {
            self.tx
                .send(event.clone())
                .map_err(|_| RenoError::Other("progress receiver dropped".to_string()))
        });
    }
}

/// One finished (or failed) stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub label: String,
    pub percent: u8,
    pub duration_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub at: DateTime<Utc>,
}

/// Stage history plus event fan-out
pub struct ProgressTracker {
    sinks: Vec<Box<dyn ProgressSink>>,
    current: Option<(Stage, Instant)>,
    percent: u8,
    history: Vec<StageRecord>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            current: None,
            percent: 0,
            history: Vec::new(),
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn ProgressSink>) {
        self.sinks.push(sink);
    }

    /// Forget the previous run
    pub fn reset(&mut self) {
        self.current = None;
        self.percent = 0;
        self.history.clear();
    }

    pub fn begin(&mut self, stage: Stage) {
        self.current = Some((stage, Instant::now()));
        // Never report going backwards
        self.percent = self.percent.max(stage.percent());
        self.emit(stage, stage.label(), ProgressKind::StageStarted);
    }

    pub fn complete(&mut self, stage: Stage) {
        let duration_ms = self.finish_record(stage, None);
        self.emit(stage, stage.label(), ProgressKind::StageCompleted { duration_ms });
    }

    pub fn fail(&mut self, stage: Stage, error: &str) {
        self.finish_record(stage, Some(error.to_string()));
        self.emit(
            stage,
            stage.label(),
            ProgressKind::StageFailed {
                error: error.to_string(),
            },
        );
    }

    pub fn item_progress(&mut self, created: usize, failed: usize, total: usize) {
        let stage = self.current_stage().unwrap_or(Stage::CreatingItems);
        let label = format!("Creating tasks and items... ({}/{})", created + failed, total);
        self.emit(
            stage,
            &label,
            ProgressKind::ItemProgress {
                created,
                failed,
                total,
            },
        );
    }

    pub fn finish(&mut self) {
        self.current = None;
        self.percent = Stage::Done.percent();
        self.emit(Stage::Done, Stage::Done.label(), ProgressKind::Finished);
    }

    pub fn current_stage(&self) -> Option<Stage> {
        self.current.map(|(stage, _)| stage)
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn history(&self) -> &[StageRecord] {
        &self.history
    }

    fn finish_record(&mut self, stage: Stage, error: Option<String>) -> u64 {
        let duration_ms = match self.current {
            Some((current, started)) if current == stage => {
                started.elapsed().as_millis() as u64
            }
            _ => 0,
        };
        self.history.push(StageRecord {
            stage,
            label: stage.label().to_string(),
            percent: stage.percent(),
            duration_ms,
            success: error.is_none(),
            error,
            at: Utc::now(),
        });
        duration_ms
    }

    fn emit(&self, stage: Stage, label: &str, kind: ProgressKind) {
        let event = ProgressEvent {
            stage,
            label: label.to_string(),
            percent: self.percent,
            kind,
            at: Utc::now(),
        };
        for sink in &self.sinks {
            sink.emit(&event);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
