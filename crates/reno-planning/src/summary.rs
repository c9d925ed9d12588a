//! Human-readable plan summary for the review stage

use reno_core::{BoardPlan, SourceKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Counts and highlights of a synthesized plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub board_name: String,
    pub total_groups: usize,
    pub total_items: usize,
    pub items_by_kind: BTreeMap<SourceKind, usize>,
    pub groups: Vec<GroupInfo>,
    /// Scopes broken into steps, as "area: scope (n steps)"
    pub step_scopes: Vec<String>,
    pub enhanced_scopes: Vec<String>,
    /// Scopes where enhancement was requested but not applied, with the reason
    pub fallbacks: Vec<String>,
}

/// Group information for summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupInfo {
    pub position: usize,
    pub title: String,
    pub items: usize,
}

impl PlanSummary {
    pub fn of(plan: &BoardPlan) -> Self {
        let mut items_by_kind = BTreeMap::new();
        let mut step_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
        let mut step_order = Vec::new();

        for item in &plan.items {
            *items_by_kind.entry(item.provenance.kind).or_insert(0) += 1;

            if matches!(item.provenance.kind, SourceKind::Step | SourceKind::AiStep) {
                if let Some(scope) = &item.provenance.parent_scope {
                    let key = (item.group_title.clone(), scope.clone());
                    let count = step_counts.entry(key.clone()).or_insert(0);
                    if *count == 0 {
                        step_order.push(key);
                    }
                    *count += 1;
                }
            }
        }

        let step_scopes = step_order
            .iter()
            .map(|key| format!("{}: {} ({} steps)", key.0, key.1, step_counts[key]))
            .collect();

        let enhanced: BTreeSet<String> = plan
            .enrichments
            .iter()
            .filter(|e| e.succeeded)
            .map(|e| format!("{}: {}", e.area, e.scope))
            .collect();

        let fallbacks = plan
            .enrichments
            .iter()
            .filter(|e| !e.succeeded)
            .map(|e| {
                format!(
                    "{}: {} ({})",
                    e.area,
                    e.scope,
                    e.fallback_reason.as_deref().unwrap_or("unknown reason")
                )
            })
            .collect();

        Self {
            board_name: plan.board_name.clone(),
            total_groups: plan.groups.len(),
            total_items: plan.items.len(),
            items_by_kind,
            groups: plan
                .groups
                .iter()
                .map(|g| GroupInfo {
                    position: g.position,
                    title: g.title.clone(),
                    items: plan.items_in_group(&g.title).count(),
                })
                .collect(),
            step_scopes,
            enhanced_scopes: enhanced.into_iter().collect(),
            fallbacks,
        }
    }
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Board: {}", self.board_name)?;
        writeln!(f, "  Groups: {}", self.total_groups)?;
        writeln!(f, "  Items: {}", self.total_items)?;
        for (kind, count) in &self.items_by_kind {
            writeln!(f, "    {}: {}", kind, count)?;
        }
        writeln!(f)?;
        writeln!(f, "Groups:")?;
        for group in &self.groups {
            writeln!(f, "  {}. {} ({} items)", group.position, group.title, group.items)?;
        }
        if !self.step_scopes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Step breakdowns:")?;
            for scope in &self.step_scopes {
                writeln!(f, "  {}", scope)?;
            }
        }
        if !self.enhanced_scopes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Enhanced:")?;
            for scope in &self.enhanced_scopes {
                writeln!(f, "  {}", scope)?;
            }
        }
        if !self.fallbacks.is_empty() {
            writeln!(f)?;
            writeln!(f, "Template fallbacks:")?;
            for scope in &self.fallbacks {
                writeln!(f, "  {}", scope)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::enhance::UnavailableEnhancer;
    use crate::synthesizer::{SynthesisOptions, Synthesizer};
    use chrono::NaiveDate;
    use reno_core::{ScopeChoice, Selection};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_summary_counts() {
        let synth = Synthesizer::new(
            Arc::new(StaticCatalog),
            Arc::new(UnavailableEnhancer),
            SynthesisOptions::default(),
        );
        let selection = Selection::new("Elm Court")
            .with_scope(
                "Bathroom",
                ScopeChoice::new("Toilet replacement or upgrade").enhanced("low flow"),
            )
            .with_scope("Bathroom", ScopeChoice::new("Accessibility modifications"));
        let plan = synth
            .synthesize_at(&selection, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .await
            .unwrap();

        let summary = PlanSummary::of(&plan);
        assert_eq!(summary.total_groups, 3);
        assert_eq!(summary.total_items, 10 + 7 + 6 + 1);
        assert_eq!(summary.items_by_kind[&SourceKind::Fixed], 10);
        assert_eq!(summary.items_by_kind[&SourceKind::Step], 6);
        assert_eq!(summary.items_by_kind[&SourceKind::SingleScope], 1);
        assert_eq!(
            summary.step_scopes,
            vec!["Bathroom: Toilet replacement or upgrade (6 steps)"]
        );
        assert_eq!(summary.groups[2].items, 7);
        assert_eq!(summary.fallbacks.len(), 1);

        let rendered = summary.to_string();
        assert!(rendered.contains("Board: Elm Court - Renovation Project"));
        assert!(rendered.contains("  2. Bathroom (7 items)"));
        assert!(rendered.contains("Template fallbacks:"));
    }
}
