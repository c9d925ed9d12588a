//! Reno Planning - selection to board plan synthesis
//!
//! This crate holds the static renovation catalogue and step templates,
//! validates user selections against it, and synthesizes the network-free
//! [`reno_core::BoardPlan`] that the orchestrator later creates remotely.

pub mod catalog;
pub mod columns;
pub mod enhance;
pub mod summary;
pub mod synthesizer;
pub mod templates;
pub mod validate;

pub use catalog::{Catalog, FixedTaskLists, StaticCatalog};
pub use columns::{ColumnSpec, STANDARD_COLUMNS};
pub use enhance::{parse_enhancement, Enhancer, UnavailableEnhancer, MAX_STEP_DURATION_DAYS};
pub use summary::PlanSummary;
pub use synthesizer::{StepSource, SynthesisOptions, Synthesizer};
pub use validate::{board_name, sanitize_project_name, validate_selection, validate_workspace_id};
