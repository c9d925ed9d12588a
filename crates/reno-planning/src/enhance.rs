//! Enhancement collaborator contract and payload parsing
//!
//! An [`Enhancer`] receives a scope's template steps plus free-text context
//! and returns a possibly modified step list. It is best-effort and
//! single-shot: the synthesizer bounds it with a timeout and falls back to
//! the template on any failure.

use async_trait::async_trait;
use reno_core::{
    EnhancementContext, EnhancementResult, Insight, Priority, RenoError, Result, Step,
};
use serde_json::Value;

/// Longest duration accepted for a single step
pub const MAX_STEP_DURATION_DAYS: u32 = 3650;

/// Pluggable step enrichment collaborator
#[async_trait]
pub trait Enhancer: Send + Sync {
    /// Queried once when a synthesizer is built and treated as static
    fn is_available(&self) -> bool;

    async fn enhance(
        &self,
        steps: &[Step],
        context: &EnhancementContext,
    ) -> Result<EnhancementResult>;
}

/// Enhancer used when no enrichment service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEnhancer;

#[async_trait]
impl Enhancer for UnavailableEnhancer {
    fn is_available(&self) -> bool {
        false
    }

    async fn enhance(
        &self,
        _steps: &[Step],
        _context: &EnhancementContext,
    ) -> Result<EnhancementResult> {
        Ok(EnhancementResult::failure("enhancement service unavailable"))
    }
}

/// Parse an enrichment service response.
///
/// Accepts `enhancedSteps` or `steps` for the step array and
/// `researchInsights` or `insights` for findings. A missing step array or a
/// non-object entry is an error; an `error` field marks the result failed.
pub fn parse_enhancement(payload: &Value) -> Result<EnhancementResult> {
    let obj = payload
        .as_object()
        .ok_or_else(|| invalid("response is not an object"))?;

    if let Some(message) = obj.get("error").and_then(Value::as_str) {
        return Ok(EnhancementResult::failure(message));
    }

    let raw_steps = obj
        .get("enhancedSteps")
        .or_else(|| obj.get("steps"))
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("missing step array"))?;

    let steps = raw_steps
        .iter()
        .enumerate()
        .map(|(idx, raw)| parse_step(idx, raw))
        .collect::<Result<Vec<_>>>()?;

    let insights = obj
        .get("researchInsights")
        .or_else(|| obj.get("insights"))
        .and_then(Value::as_array)
        .map(|raw| raw.iter().filter_map(parse_insight).collect())
        .unwrap_or_default();

    Ok(EnhancementResult::success(steps, insights))
}

fn parse_step(idx: usize, raw: &Value) -> Result<Step> {
    let obj = raw
        .as_object()
        .ok_or_else(|| invalid(&format!("step {} is not an object", idx)))?;

    let name = str_field(raw, "name")
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| invalid(&format!("step {} has no name", idx)))?;

    let days = obj
        .get("estimatedDays")
        .or_else(|| obj.get("estimatedDurationDays"))
        .and_then(Value::as_u64)
        .unwrap_or(1);
    let days = u32::try_from(days)
        .ok()
        .filter(|d| *d <= MAX_STEP_DURATION_DAYS)
        .ok_or_else(|| {
            invalid(&format!(
                "step {} estimates {} days, more than {}",
                idx, days, MAX_STEP_DURATION_DAYS
            ))
        })?;

    let priority = str_field(raw, "priority")
        .and_then(|p| p.parse::<Priority>().ok())
        .unwrap_or_default();

    Ok(Step {
        name,
        description: str_field(raw, "description").unwrap_or_default(),
        estimated_duration_days: days,
        priority,
        dependencies: str_list(obj.get("dependencies")),
        compliance_notes: str_list(obj.get("complianceNotes")),
        research_based: obj
            .get("researchBased")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

fn parse_insight(raw: &Value) -> Option<Insight> {
    Some(Insight {
        category: str_field(raw, "category")?,
        finding: str_field(raw, "finding")?,
        source: str_field(raw, "source").unwrap_or_default(),
        impact: str_field(raw, "impact").unwrap_or_default(),
    })
}

fn str_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

fn str_list(raw: Option<&Value>) -> Vec<String> {
    raw.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn invalid(reason: &str) -> RenoError {
    RenoError::Validation(format!("Invalid enhancement payload: {}", reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wire_shape() {
        let result = parse_enhancement(&json!({
            "enhancedSteps": [
                {"name": "Structural Engineering Consultation", "estimatedDays": 5,
                 "priority": "High", "dependencies": [], "researchBased": true,
                 "complianceNotes": ["Engineering drawings must be stamped"]},
                {"name": "Planning & Measurement", "description": "Measure", "estimatedDays": 2}
            ],
            "researchInsights": [
                {"category": "Warnings", "finding": "Engineer required",
                 "source": "IBC", "impact": "Extra permits"}
            ],
            "mockService": true
        }))
        .unwrap();

        assert!(result.succeeded);
        assert_eq!(result.steps.len(), 2);
        assert!(result.steps[0].research_based);
        assert_eq!(result.steps[0].estimated_duration_days, 5);
        assert_eq!(result.steps[1].priority, Priority::Medium);
        assert_eq!(result.insights.len(), 1);
    }

    #[test]
    fn test_parse_accepts_plain_steps_key() {
        let result = parse_enhancement(&json!({"steps": [{"name": "Only"}]})).unwrap();
        assert_eq!(result.steps[0].name, "Only");
        assert_eq!(result.steps[0].estimated_duration_days, 1);
        assert!(result.insights.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_payloads() {
        assert!(parse_enhancement(&json!([])).is_err());
        assert!(parse_enhancement(&json!({"insights": []})).is_err());
        assert!(parse_enhancement(&json!({"steps": "nope"})).is_err());
        assert!(parse_enhancement(&json!({"steps": [{"name": "ok"}, 7]})).is_err());
        assert!(parse_enhancement(&json!({"steps": [{"description": "no name"}]})).is_err());
    }

    #[test]
    fn test_parse_rejects_implausible_durations() {
        let err = parse_enhancement(&json!({
            "enhancedSteps": [{"name": "Long", "estimatedDays": 5_000_000_000u64}]
        }))
        .unwrap_err();
        assert!(matches!(err, RenoError::Validation(_)));
        assert!(err.to_string().contains("5000000000 days"));

        let limit = MAX_STEP_DURATION_DAYS;
        let result = parse_enhancement(&json!({"steps": [{"name": "Edge", "estimatedDays": limit}]}))
            .unwrap();
        assert_eq!(result.steps[0].estimated_duration_days, limit);
        assert!(parse_enhancement(&json!({"steps": [{"name": "Over", "estimatedDays": limit + 1}]}))
            .is_err());
    }

    #[test]
    fn test_parse_error_field_is_failure() {
        let result = parse_enhancement(&json!({"error": "quota exceeded"})).unwrap();
        assert!(!result.succeeded);
        assert_eq!(result.error_message.as_deref(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn test_unavailable_enhancer() {
        let enhancer = UnavailableEnhancer;
        assert!(!enhancer.is_available());
        let result = enhancer
            .enhance(&[], &EnhancementContext::default())
            .await
            .unwrap();
        assert!(!result.succeeded);
    }
}
