//! Standard board columns and deterministic column values

use chrono::{Days, NaiveDate};
use reno_core::{column_keys, Priority, SourceKind, Step};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Due-date offset for design and planning tasks
pub const PLANNING_OFFSET_DAYS: u64 = 14;
/// Due-date offset for permit tasks
pub const PERMITTING_OFFSET_DAYS: u64 = 21;
/// Due-date offset for a scope that is not broken into steps
pub const SINGLE_SCOPE_OFFSET_DAYS: u64 = 30;

pub const DEFAULT_STATUS: &str = "Not Started";

/// A column every board gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Logical key used in synthesized column values
    pub key: &'static str,
    pub title: &'static str,
    /// Remote column type
    pub column_type: &'static str,
    pub description: &'static str,
}

pub const STANDARD_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        key: column_keys::STATUS,
        title: "Status",
        column_type: "status",
        description: "Task progress",
    },
    ColumnSpec {
        key: column_keys::PERSON,
        title: "Assignee",
        column_type: "people",
        description: "Person responsible for the task",
    },
    ColumnSpec {
        key: column_keys::DUE_DATE,
        title: "Due Date",
        column_type: "date",
        description: "Target completion date",
    },
    ColumnSpec {
        key: column_keys::PRIORITY,
        title: "Priority",
        column_type: "dropdown",
        description: "High, Medium or Low",
    },
    ColumnSpec {
        key: column_keys::NOTES,
        title: "Notes",
        column_type: "text",
        description: "Task details, dependencies and compliance notes",
    },
];

/// Values for a fixed planning or permitting task.
pub fn fixed_task_values(kind: SourceKind, task: &str, today: NaiveDate) -> BTreeMap<String, Value> {
    let (label, offset) = match kind {
        SourceKind::Permitting => ("Permitting task", PERMITTING_OFFSET_DAYS),
        _ => ("Planning task", PLANNING_OFFSET_DAYS),
    };
    base_values(
        Priority::High,
        due_after(today, offset),
        format!("{}: {}", label, task),
    )
}

/// Values for a scope created as one undecomposed item.
pub fn single_scope_values(area: &str, scope: &str, today: NaiveDate) -> BTreeMap<String, Value> {
    base_values(
        Priority::Medium,
        due_after(today, SINGLE_SCOPE_OFFSET_DAYS),
        format!("Renovation task: {} ({})", scope, area),
    )
}

/// Values for one step of a scope breakdown.
///
/// Dependencies and compliance notes are flattened into the notes text.
pub fn step_values(
    step: &Step,
    step_index: usize,
    step_count: usize,
    area: &str,
    scope: &str,
    today: NaiveDate,
) -> BTreeMap<String, Value> {
    let mut notes = format!(
        "Step {} of {} for {} ({})",
        step_index + 1,
        step_count,
        scope,
        area
    );
    if !step.description.is_empty() {
        notes.push_str(": ");
        notes.push_str(&step.description);
    }
    if !step.dependencies.is_empty() {
        notes.push_str(&format!(" | Depends on: {}", step.dependencies.join(", ")));
    }
    if !step.compliance_notes.is_empty() {
        notes.push_str(&format!(" | Compliance: {}", step.compliance_notes.join("; ")));
    }

    base_values(
        step.priority,
        due_after(today, u64::from(step.estimated_duration_days)),
        notes,
    )
}

/// Due date `days` after `today`, or `None` past the end of the calendar.
pub fn due_after(today: NaiveDate, days: u64) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(days))
}

/// The due date column is left out when no date can be computed.
fn base_values(
    priority: Priority,
    due: Option<NaiveDate>,
    notes: String,
) -> BTreeMap<String, Value> {
    let mut values = BTreeMap::new();
    values.insert(
        column_keys::STATUS.to_string(),
        json!({ "label": DEFAULT_STATUS }),
    );
    values.insert(
        column_keys::PRIORITY.to_string(),
        json!({ "labels": [priority.to_string()] }),
    );
    if let Some(due) = due {
        values.insert(
            column_keys::DUE_DATE.to_string(),
            json!({ "date": due.format("%Y-%m-%d").to_string() }),
        );
    }
    values.insert(column_keys::NOTES.to_string(), Value::String(notes));
    values
}
