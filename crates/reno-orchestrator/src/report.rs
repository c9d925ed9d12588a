//! Completion report and fatal failure context

use reno_core::{DomainErrorKind, RenoError};
use reno_planning::PlanSummary;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::progress::StageRecord;
use crate::state_machine::Stage;

/// Overall outcome of a run that reached the end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    /// The board exists but some items could not be created
    PartialFailure,
}

/// An item that could not be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub name: String,
    pub group: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Summary of a finished creation run
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReport {
    pub run_id: Uuid,
    pub board_id: String,
    pub board_url: String,
    pub groups_created: usize,
    pub groups_attempted: usize,
    pub items_created: usize,
    pub items_attempted: usize,
    pub elapsed: Duration,
    pub item_failures: Vec<ItemFailure>,
    pub warnings: Vec<String>,
    pub status: RunStatus,
    pub stages: Vec<StageRecord>,
}

impl CompletionReport {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

impl fmt::Display for CompletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board: {} ({})", self.board_url, self.board_id)?;
        writeln!(
            f,
            "Groups: {}/{} created",
            self.groups_created, self.groups_attempted
        )?;
        writeln!(
            f,
            "Items: {}/{} created",
            self.items_created, self.items_attempted
        )?;
        writeln!(f, "Elapsed: {:.1}s", self.elapsed.as_secs_f64())?;

        if !self.item_failures.is_empty() {
            writeln!(f, "\nFailed items:")?;
            for failure in &self.item_failures {
                writeln!(
                    f,
                    "  - {} [{}]: {}",
                    failure.name, failure.group, failure.message
                )?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\nWarnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  - {}", warning)?;
            }
        }

        match self.status {
            RunStatus::Success => write!(f, "\nStatus: success"),
            RunStatus::PartialFailure => write!(
                f,
                "\nStatus: partial failure ({} items failed)",
                self.item_failures.len()
            ),
        }
    }
}

/// A run that stopped before completing
///
/// Carries the stage, timing and plan context, plus whatever remote state
/// already exists so the user can find or clean it up.
#[derive(Debug, Error)]
#[error("Board creation failed while {stage} after {:.1}s: {source}", .elapsed.as_secs_f64())]
pub struct CreationFailure {
    pub run_id: Uuid,
    pub stage: Stage,
    pub elapsed: Duration,
    pub plan: PlanSummary,
    pub board_id: Option<String>,
    pub board_url: Option<String>,
    /// Titles of groups created before the failure
    pub groups_created: Vec<String>,
    pub stages: Vec<StageRecord>,
    pub source: RenoError,
}

impl CreationFailure {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.source, RenoError::Cancelled(_))
    }

    /// Short message for the user: the mapped API message when the code is
    /// known, otherwise the raw message prefixed with the stage name.
    pub fn user_message(&self) -> String {
        if let Some(message) = self.source.domain().and_then(|d| d.user_message()) {
            return message.to_string();
        }
        match self.source.root() {
            RenoError::Cancelled(_) => format!("Board creation cancelled before {}", self.stage),
            root => format!("{}: {}", self.stage, root),
        }
    }

    /// Whether the failure came from a rejected credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.source.domain().map(|d| &d.kind),
            Some(DomainErrorKind::Unauthorized)
        ) || matches!(self.source.root(), RenoError::Auth(_))
    }
}
