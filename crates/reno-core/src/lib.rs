//! # reno-core
//!
//! Core types for turning a renovation selection into a remote project board.
//!
//! A [`Selection`] (areas, chosen scopes, optional enrichment requests) is
//! synthesized into a [`BoardPlan`] of groups and items, which the
//! orchestrator then materializes against the remote work-management API.
//!
//! ## Fixed shape
//!
//! - Group 0 is always "Design and Planning", group 1 is always "Permitting"
//! - One further group per selected area, in selection order
//! - Item positions are assigned at synthesis time and never renumbered

pub mod config;
mod error;
pub mod fail_open;
mod types;

pub use config::RenoConfig;
pub use error::{DomainError, DomainErrorKind, RenoError, Result};
pub use types::*;
