//! HTTP adapter for an external step enrichment service

use async_trait::async_trait;
use reno_core::config::EnhancementConfig;
use reno_core::{EnhancementContext, EnhancementResult, RenoError, Result, Step};
use reno_planning::{parse_enhancement, Enhancer};
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// Posts template steps and job context to an enrichment endpoint
#[derive(Debug, Clone)]
pub struct HttpEnhancer {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpEnhancer {
    /// Available only when enhancement is enabled and an endpoint is configured.
    pub fn from_config(config: &EnhancementConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RenoError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone().filter(|_| config.enabled),
        })
    }

    fn payload(steps: &[Step], context: &EnhancementContext) -> Value {
        json!({
            "baseSteps": steps,
            "jobDescription": context.free_text,
            "area": context.area,
            "scope": context.scope,
            "location": context.location,
        })
    }
}

#[async_trait]
impl Enhancer for HttpEnhancer {
    fn is_available(&self) -> bool {
        self.endpoint.is_some()
    }

    #[instrument(skip(self, steps, context), fields(scope = %context.scope))]
    async fn enhance(
        &self,
        steps: &[Step],
        context: &EnhancementContext,
    ) -> Result<EnhancementResult> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(EnhancementResult::failure("enhancement service unavailable"));
        };

        debug!(steps = steps.len(), "Requesting step enhancement");
        let response = self
            .client
            .post(endpoint)
            .json(&Self::payload(steps, context))
            .send()
            .await
            .map_err(|e| RenoError::Network(format!("Enhancement request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(EnhancementResult::failure(format!(
                "enhancement service returned {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RenoError::Network(format!("Failed to read enhancement: {}", e)))?;
        parse_enhancement(&body)
    }
}
