//! Selection to board plan synthesis
//!
//! Turns a validated [`Selection`] and the catalogue into a [`BoardPlan`].
//! Nothing here touches the network; the only suspension point is the
//! optional enhancement call, which is bounded by a timeout and can only
//! degrade a scope back to its template.

use chrono::{NaiveDate, Utc};
use reno_core::{
    BoardGroup, BoardPlan, EnhancementContext, EnrichmentRecord, Insight, Provenance, Result,
    ScopeChoice, Selection, SourceKind, Step, StepTemplate, TaskItem, DESIGN_GROUP,
    PERMITTING_GROUP,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::columns;
use crate::enhance::{Enhancer, MAX_STEP_DURATION_DAYS};
use crate::validate::{board_name, validate_selection};

/// Knobs that change the shape of a synthesized plan
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Break templated scopes into one item per step
    pub step_breakdowns: bool,
    pub enhancement_timeout: Duration,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            step_breakdowns: true,
            enhancement_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&reno_core::RenoConfig> for SynthesisOptions {
    fn from(config: &reno_core::RenoConfig) -> Self {
        Self {
            step_breakdowns: config.creation.step_breakdowns,
            enhancement_timeout: config.enhancement.timeout(),
        }
    }
}

/// How a single scope turns into items, decided once per scope
#[derive(Debug, Clone, PartialEq)]
pub enum StepSource {
    /// Template steps; `fallback` holds the reason enhancement was abandoned
    Template {
        steps: Vec<Step>,
        fallback: Option<String>,
    },
    Enhanced {
        steps: Vec<Step>,
        insights: Vec<Insight>,
    },
    SingleItem,
}

/// Builds board plans from selections
pub struct Synthesizer {
    catalog: Arc<dyn Catalog>,
    enhancer: Arc<dyn Enhancer>,
    enhancer_available: bool,
    options: SynthesisOptions,
}

impl Synthesizer {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        enhancer: Arc<dyn Enhancer>,
        options: SynthesisOptions,
    ) -> Self {
        let enhancer_available = enhancer.is_available();
        debug!(enhancer_available, "Synthesizer ready");
        Self {
            catalog,
            enhancer,
            enhancer_available,
            options,
        }
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Synthesize a plan with due dates relative to today (UTC).
    pub async fn synthesize(&self, selection: &Selection) -> Result<BoardPlan> {
        self.synthesize_at(selection, Utc::now().date_naive()).await
    }

    /// Synthesize a plan with due dates relative to `today`.
    pub async fn synthesize_at(&self, selection: &Selection, today: NaiveDate) -> Result<BoardPlan> {
        validate_selection(selection, self.catalog.as_ref())?;

        let mut plan = BoardPlan {
            board_name: board_name(&selection.project_name)?,
            groups: Vec::new(),
            items: Vec::new(),
            enrichments: Vec::new(),
        };

        let fixed = self.catalog.fixed_task_lists();
        push_group(&mut plan, DESIGN_GROUP);
        for (position, task) in fixed.planning.iter().enumerate() {
            plan.items.push(TaskItem {
                name: task.clone(),
                group_title: DESIGN_GROUP.to_string(),
                position,
                column_values: columns::fixed_task_values(SourceKind::Fixed, task, today),
                provenance: Provenance::of(SourceKind::Fixed),
                remote_id: None,
            });
        }

        push_group(&mut plan, PERMITTING_GROUP);
        for (position, task) in fixed.permitting.iter().enumerate() {
            plan.items.push(TaskItem {
                name: task.clone(),
                group_title: PERMITTING_GROUP.to_string(),
                position,
                column_values: columns::fixed_task_values(SourceKind::Permitting, task, today),
                provenance: Provenance::of(SourceKind::Permitting),
                remote_id: None,
            });
        }

        for area in &selection.areas {
            push_group(&mut plan, area);
            let mut position = 0;

            for choice in selection.scopes_for(area) {
                let source = self
                    .decide_source(area, choice, today, &mut plan.enrichments)
                    .await;
                for item in scope_items(area, &choice.name, source, today) {
                    plan.items.push(TaskItem { position, ..item });
                    position += 1;
                }
            }
        }

        plan.validate()?;
        info!(
            board = %plan.board_name,
            groups = plan.groups.len(),
            items = plan.items.len(),
            "Synthesized board plan"
        );
        Ok(plan)
    }

    /// Pick the step source for one scope. Never fails; enhancement problems
    /// degrade to the template and are recorded in `enrichments`.
    async fn decide_source(
        &self,
        area: &str,
        choice: &ScopeChoice,
        today: NaiveDate,
        enrichments: &mut Vec<EnrichmentRecord>,
    ) -> StepSource {
        let template = if self.options.step_breakdowns {
            self.catalog.step_template(area, &choice.name)
        } else {
            None
        };

        let Some(template) = template else {
            return StepSource::SingleItem;
        };

        if !choice.enhance {
            return StepSource::Template {
                steps: template.steps,
                fallback: None,
            };
        }

        if !self.enhancer_available {
            enrichments.push(EnrichmentRecord {
                area: area.to_string(),
                scope: choice.name.clone(),
                succeeded: false,
                insights: Vec::new(),
                fallback_reason: Some("enhancement service unavailable".to_string()),
            });
            return StepSource::Template {
                steps: template.steps,
                fallback: None,
            };
        }

        let (source, record) = match self.try_enhance(area, choice, &template, today).await {
            Ok((steps, insights)) => {
                let record = EnrichmentRecord {
                    area: area.to_string(),
                    scope: choice.name.clone(),
                    succeeded: true,
                    insights: insights.clone(),
                    fallback_reason: None,
                };
                (StepSource::Enhanced { steps, insights }, record)
            }
            Err(reason) => {
                warn!(area, scope = %choice.name, %reason, "Falling back to template steps");
                let record = EnrichmentRecord {
                    area: area.to_string(),
                    scope: choice.name.clone(),
                    succeeded: false,
                    insights: Vec::new(),
                    fallback_reason: Some(reason.clone()),
                };
                let source = StepSource::Template {
                    steps: template.steps,
                    fallback: Some(reason),
                };
                (source, record)
            }
        };
        enrichments.push(record);
        source
    }

    /// One bounded enhancement attempt. `Err` carries the fallback reason.
    async fn try_enhance(
        &self,
        area: &str,
        choice: &ScopeChoice,
        template: &StepTemplate,
        today: NaiveDate,
    ) -> std::result::Result<(Vec<Step>, Vec<Insight>), String> {
        let context = EnhancementContext {
            free_text: choice.context.clone().unwrap_or_default(),
            area: area.to_string(),
            scope: choice.name.clone(),
            location: choice.location.clone(),
        };

        let outcome = tokio::time::timeout(
            self.options.enhancement_timeout,
            self.enhancer.enhance(&template.steps, &context),
        )
        .await;

        match outcome {
            Err(_) => Err(format!(
                "enhancement timed out after {}s",
                self.options.enhancement_timeout.as_secs()
            )),
            Ok(Err(e)) => Err(e.to_string()),
            Ok(Ok(result)) if !result.succeeded => Err(result
                .error_message
                .unwrap_or_else(|| "enhancement failed".to_string())),
            Ok(Ok(result)) if result.steps.is_empty() => {
                Err("enhancement returned no steps".to_string())
            }
            Ok(Ok(result)) => {
                if let Some(step) = result.steps.iter().find(|s| !schedulable(s, today)) {
                    return Err(format!(
                        "enhanced step '{}' estimates {} days",
                        step.name, step.estimated_duration_days
                    ));
                }
                debug!(
                    area,
                    scope = %choice.name,
                    base = template.steps.len(),
                    enhanced = result.steps.len(),
                    "Using enhanced steps"
                );
                Ok((result.steps, result.insights))
            }
        }
    }
}

/// Enhanced durations must be plausible and land on a representable due date.
fn schedulable(step: &Step, today: NaiveDate) -> bool {
    step.estimated_duration_days <= MAX_STEP_DURATION_DAYS
        && columns::due_after(today, u64::from(step.estimated_duration_days)).is_some()
}

fn push_group(plan: &mut BoardPlan, title: &str) {
    let position = plan.groups.len();
    plan.groups.push(BoardGroup {
        title: title.to_string(),
        position,
        remote_id: None,
    });
}

/// Items for one scope. Positions are filled in by the caller.
fn scope_items(area: &str, scope: &str, source: StepSource, today: NaiveDate) -> Vec<TaskItem> {
    let (steps, kind, fallback) = match source {
        StepSource::SingleItem => {
            return vec![TaskItem {
                name: scope.to_string(),
                group_title: area.to_string(),
                position: 0,
                column_values: columns::single_scope_values(area, scope, today),
                provenance: Provenance {
                    kind: SourceKind::SingleScope,
                    parent_scope: Some(scope.to_string()),
                    step_index: None,
                    fallback: false,
                },
                remote_id: None,
            }];
        }
        StepSource::Template { steps, fallback } => (steps, SourceKind::Step, fallback.is_some()),
        StepSource::Enhanced { steps, .. } => (steps, SourceKind::AiStep, false),
    };

    let count = steps.len();
    steps
        .iter()
        .enumerate()
        .map(|(idx, step)| TaskItem {
            name: step.name.clone(),
            group_title: area.to_string(),
            position: 0,
            column_values: columns::step_values(step, idx, count, area, scope, today),
            provenance: Provenance {
                kind,
                parent_scope: Some(scope.to_string()),
                step_index: Some(idx),
                fallback,
            },
            remote_id: None,
        })
        .collect()
}
