//! Transport trait and composable middleware
//!
//! A request passes through the layers in a fixed order:
//! rate-limit -> send -> classify -> retry. [`HttpTransport`] sends and
//! classifies, [`RateLimited`] gates each attempt, and [`Retrying`] owns the
//! backoff loop around both.

use async_trait::async_trait;
use reno_core::config::{ApiConfig, RetryConfig};
use reno_core::{RenoError, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::classify::classify;
use crate::rate_limiter::RateLimiter;
use crate::request::GraphQlRequest;

/// Sends one request and returns the classified `data` payload
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &GraphQlRequest) -> Result<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &GraphQlRequest) -> Result<Value> {
        (**self).send(request).await
    }
}

/// HTTPS transport to the work-management API
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_version: String,
    token: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RenoError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_version: config.api_version.clone(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(operation = %request.operation))]
    async fn send(&self, request: &GraphQlRequest) -> Result<Value> {
        debug!("Sending request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.token)
            .header("API-Version", &self.api_version)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| RenoError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = response
            .text()
            .await
            .map_err(|e| RenoError::Network(format!("Failed to read response: {}", e)))?;

        classify(status, retry_after, &body)
    }
}

/// Gates every request through a shared [`RateLimiter`]
pub struct RateLimited<T> {
    inner: T,
    limiter: Arc<RateLimiter>,
}

impl<T> RateLimited<T> {
    pub fn new(inner: T, limiter: Arc<RateLimiter>) -> Self {
        Self { inner, limiter }
    }
}

#[async_trait]
impl<T: Transport> Transport for RateLimited<T> {
    async fn send(&self, request: &GraphQlRequest) -> Result<Value> {
        self.limiter.admit().await;
        self.inner.send(request).await
    }
}

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.base_delay(),
        }
    }
}

/// Retries retryable failures with exponential backoff
pub struct Retrying<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> Retrying<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<T: Transport> Transport for Retrying<T> {
    async fn send(&self, request: &GraphQlRequest) -> Result<Value> {
        let mut attempt = 0;
        loop {
            let err = match self.inner.send(request).await {
                Ok(data) => return Ok(data),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            if attempt >= self.policy.max_retries {
                warn!(
                    operation = %request.operation,
                    attempts = attempt + 1,
                    "Giving up: {}",
                    err
                );
                return Err(RenoError::ExhaustedRetries {
                    attempts: attempt + 1,
                    last: Box::new(err),
                });
            }

            let delay = err
                .retry_after()
                .unwrap_or_else(|| self.policy.backoff(attempt));
            warn!(
                operation = %request.operation,
                "Attempt {}/{} failed, retrying in {}ms: {}",
                attempt + 1,
                self.policy.max_retries + 1,
                delay.as_millis(),
                err
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
