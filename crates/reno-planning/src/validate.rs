//! Selection, project name and workspace id validation

use regex::Regex;
use reno_core::{RenoError, Result, Selection};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::catalog::Catalog;

const MAX_PROJECT_NAME_LEN: usize = 50;
const MIN_PROJECT_NAME_LEN: usize = 3;

fn forbidden_name_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("static regex"))
}

fn workspace_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{3,50}$").expect("static regex"))
}

/// Trim, strip characters the remote service rejects, and cap the length.
pub fn sanitize_project_name(name: &str) -> Result<String> {
    let stripped = forbidden_name_chars().replace_all(name.trim(), "");
    let sanitized: String = stripped.chars().take(MAX_PROJECT_NAME_LEN).collect();
    let sanitized = sanitized.trim().to_string();

    if sanitized.chars().count() < MIN_PROJECT_NAME_LEN {
        return Err(RenoError::Validation(format!(
            "Project name must be at least {} characters long",
            MIN_PROJECT_NAME_LEN
        )));
    }
    Ok(sanitized)
}

/// Board title derived from a project name
pub fn board_name(project_name: &str) -> Result<String> {
    Ok(format!("{} - Renovation Project", sanitize_project_name(project_name)?))
}

pub fn validate_workspace_id(id: &str) -> Result<String> {
    let trimmed = id.trim();
    if !workspace_id_pattern().is_match(trimmed) {
        return Err(RenoError::Validation(format!(
            "Workspace ID '{}' must be 3-50 letters, numbers, hyphens or underscores",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

/// Check a selection against the catalogue.
///
/// The area list and the scope map must name the same areas, every area
/// needs at least one scope, and every scope must belong to its area.
pub fn validate_selection(selection: &Selection, catalog: &dyn Catalog) -> Result<()> {
    if selection.areas.is_empty() {
        return Err(RenoError::Validation(
            "At least one renovation area must be selected".to_string(),
        ));
    }

    let mut seen_areas = HashSet::new();
    for area in &selection.areas {
        if !seen_areas.insert(area.as_str()) {
            return Err(RenoError::Validation(format!("Area '{}' selected twice", area)));
        }

        let known_scopes = catalog
            .scopes_for_area(area)
            .ok_or_else(|| RenoError::Validation(format!("Invalid renovation area: {}", area)))?;

        let chosen = selection.scopes_for(area);
        if chosen.is_empty() {
            return Err(RenoError::Validation(format!(
                "Area '{}' must have at least one scope selected",
                area
            )));
        }

        let mut seen_scopes = HashSet::new();
        for choice in chosen {
            if !known_scopes.iter().any(|s| s == &choice.name) {
                return Err(RenoError::Validation(format!(
                    "Invalid scope for {}: {}",
                    area, choice.name
                )));
            }
            if !seen_scopes.insert(choice.name.as_str()) {
                return Err(RenoError::Validation(format!(
                    "Scope '{}' selected twice for {}",
                    choice.name, area
                )));
            }
        }
    }

    let extra: Vec<&str> = selection
        .scopes
        .keys()
        .filter(|area| !seen_areas.contains(area.as_str()))
        .map(String::as_str)
        .collect();
    if !extra.is_empty() {
        return Err(RenoError::Validation(format!(
            "Scopes given for unselected areas: {}",
            extra.join(", ")
        )));
    }

    Ok(())
}
