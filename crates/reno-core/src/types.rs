//! Core type definitions for renovation board planning

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{RenoError, Result};

/// Title of the fixed first group on every board
pub const DESIGN_GROUP: &str = "Design and Planning";

/// Title of the fixed second group on every board
pub const PERMITTING_GROUP: &str = "Permitting";

/// Logical column keys used in synthesized column values
pub mod column_keys {
    pub const STATUS: &str = "status";
    pub const PERSON: &str = "person";
    pub const DUE_DATE: &str = "date4";
    pub const PRIORITY: &str = "dropdown";
    pub const NOTES: &str = "text";
}

/// Step priority levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[default]
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "critical" => Ok(Self::High),
            "medium" | "normal" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// One step of a scope breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "estimatedDays")]
    pub estimated_duration_days: u32,
    #[serde(default)]
    pub priority: Priority,
    /// Names of earlier steps in the same sequence
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub compliance_notes: Vec<String>,
    /// Whether the step came from an external research source rather than a template
    #[serde(default)]
    pub research_based: bool,
}

impl Step {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        estimated_duration_days: u32,
        priority: Priority,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            estimated_duration_days,
            priority,
            dependencies: Vec::new(),
            compliance_notes: Vec::new(),
            research_based: false,
        }
    }

    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_compliance(mut self, notes: &[&str]) -> Self {
        self.compliance_notes = notes.iter().map(|n| n.to_string()).collect();
        self
    }
}

/// Ordered step breakdown for an (area, scope) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTemplate {
    pub area: String,
    pub scope: String,
    pub steps: Vec<Step>,
}

impl StepTemplate {
    /// Check that every dependency names an earlier step.
    pub fn validate(&self) -> Result<()> {
        for (idx, step) in self.steps.iter().enumerate() {
            for dep in &step.dependencies {
                if !self.steps[..idx].iter().any(|s| &s.name == dep) {
                    return Err(RenoError::Validation(format!(
                        "Step '{}' of '{}' depends on '{}', which is not an earlier step",
                        step.name, self.scope, dep
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A research finding returned alongside enhanced steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub category: String,
    pub finding: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub impact: String,
}

/// Input handed to the enhancement collaborator for one scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementContext {
    pub free_text: String,
    pub area: String,
    pub scope: String,
    pub location: Option<String>,
}

/// Outcome of one enhancement call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub steps: Vec<Step>,
    pub insights: Vec<Insight>,
    pub succeeded: bool,
    pub error_message: Option<String>,
}

impl EnhancementResult {
    pub fn success(steps: Vec<Step>, insights: Vec<Insight>) -> Self {
        Self {
            steps,
            insights,
            succeeded: true,
            error_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            steps: Vec::new(),
            insights: Vec::new(),
            succeeded: false,
            error_message: Some(message.into()),
        }
    }
}

/// Where a task item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Fixed,
    Permitting,
    SingleScope,
    Step,
    AiStep,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Permitting => write!(f, "permitting"),
            Self::SingleScope => write!(f, "single-scope"),
            Self::Step => write!(f, "step"),
            Self::AiStep => write!(f, "ai-step"),
        }
    }
}

/// Provenance metadata attached to each task item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub kind: SourceKind,
    pub parent_scope: Option<String>,
    pub step_index: Option<usize>,
    /// Set when enhancement was requested but the template was used instead
    #[serde(default)]
    pub fallback: bool,
}

impl Provenance {
    pub fn of(kind: SourceKind) -> Self {
        Self {
            kind,
            parent_scope: None,
            step_index: None,
            fallback: false,
        }
    }
}

/// A single item to be created on the remote board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub name: String,
    pub group_title: String,
    pub position: usize,
    /// Logical column key -> column value payload
    pub column_values: BTreeMap<String, Value>,
    pub provenance: Provenance,
    /// Assigned by the remote service after creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

/// A group on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardGroup {
    pub title: String,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

/// Per-scope record of an enhancement attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub area: String,
    pub scope: String,
    pub succeeded: bool,
    #[serde(default)]
    pub insights: Vec<Insight>,
    pub fallback_reason: Option<String>,
}

/// Fully synthesized, network-independent board structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardPlan {
    pub board_name: String,
    pub groups: Vec<BoardGroup>,
    pub items: Vec<TaskItem>,
    #[serde(default)]
    pub enrichments: Vec<EnrichmentRecord>,
}

impl BoardPlan {
    pub fn group(&self, title: &str) -> Option<&BoardGroup> {
        self.groups.iter().find(|g| g.title == title)
    }

    /// Items belonging to a group, in plan order
    pub fn items_in_group<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a TaskItem> + 'a {
        self.items.iter().filter(move |item| item.group_title == title)
    }

    /// Check the structural invariants of a plan.
    pub fn validate(&self) -> Result<()> {
        let fixed_ok = matches!(
            (self.groups.first(), self.groups.get(1)),
            (Some(a), Some(b)) if a.title == DESIGN_GROUP && b.title == PERMITTING_GROUP
        );
        if !fixed_ok {
            return Err(RenoError::Validation(format!(
                "Plan must start with '{}' and '{}' groups",
                DESIGN_GROUP, PERMITTING_GROUP
            )));
        }

        for (idx, group) in self.groups.iter().enumerate() {
            if group.position != idx {
                return Err(RenoError::Validation(format!(
                    "Group '{}' has position {} but is at index {}",
                    group.title, group.position, idx
                )));
            }
            if self.groups[..idx].iter().any(|g| g.title == group.title) {
                return Err(RenoError::Validation(format!(
                    "Duplicate group title '{}'",
                    group.title
                )));
            }
        }

        let mut last_position: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &self.items {
            if self.group(&item.group_title).is_none() {
                return Err(RenoError::Validation(format!(
                    "Item '{}' references unknown group '{}'",
                    item.name, item.group_title
                )));
            }
            if let Some(prev) = last_position.get(item.group_title.as_str()) {
                if item.position <= *prev {
                    return Err(RenoError::Validation(format!(
                        "Item positions in group '{}' are not strictly increasing",
                        item.group_title
                    )));
                }
            }
            last_position.insert(&item.group_title, item.position);
        }

        Ok(())
    }
}

/// One chosen scope within an area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ScopeChoiceRepr")]
pub struct ScopeChoice {
    pub name: String,
    pub enhance: bool,
    pub context: Option<String>,
    pub location: Option<String>,
}

impl ScopeChoice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enhance: false,
            context: None,
            location: None,
        }
    }

    pub fn enhanced(mut self, context: impl Into<String>) -> Self {
        self.enhance = true;
        self.context = Some(context.into());
        self
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

// Selection files may list a scope as a bare name or as a full object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScopeChoiceRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        enhance: bool,
        #[serde(default)]
        context: Option<String>,
        #[serde(default)]
        location: Option<String>,
    },
}

impl From<ScopeChoiceRepr> for ScopeChoice {
    fn from(repr: ScopeChoiceRepr) -> Self {
        match repr {
            ScopeChoiceRepr::Name(name) => Self::new(name),
            ScopeChoiceRepr::Full {
                name,
                enhance,
                context,
                location,
            } => Self {
                name,
                enhance,
                context,
                location,
            },
        }
    }
}

/// User-authored description of a renovation project
///
/// `areas` fixes the emission order; `scopes` maps each area to its chosen
/// scopes in caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub project_name: String,
    #[serde(default)]
    pub areas: Vec<String>,
    #[serde(default)]
    pub scopes: BTreeMap<String, Vec<ScopeChoice>>,
}

impl Selection {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Default::default()
        }
    }

    /// Add a scope, registering its area on first use.
    pub fn with_scope(mut self, area: &str, choice: ScopeChoice) -> Self {
        if !self.areas.iter().any(|a| a == area) {
            self.areas.push(area.to_string());
        }
        self.scopes.entry(area.to_string()).or_default().push(choice);
        self
    }

    pub fn scopes_for(&self, area: &str) -> &[ScopeChoice] {
        self.scopes.get(area).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.values().map(Vec::len).sum()
    }
}
