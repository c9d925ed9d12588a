//! API client assembled from the transport layers

use reno_core::{RenoConfig, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::rate_limiter::{RateLimitStatus, RateLimiter};
use crate::request::GraphQlRequest;
use crate::transport::{HttpTransport, RateLimited, RetryPolicy, Retrying, Transport};

/// Rate-limited, retrying client for the work-management API
pub struct ApiClient {
    transport: Box<dyn Transport>,
    limiter: Arc<RateLimiter>,
}

impl ApiClient {
    /// Client over HTTPS, configured from `config`.
    pub fn from_config(config: &RenoConfig, token: impl Into<String>) -> Result<Self> {
        let http = HttpTransport::new(&config.api, token)?;
        Ok(Self::with_transport(http, config))
    }

    /// Wrap any base transport in the standard rate-limit and retry layers.
    pub fn with_transport<T: Transport + 'static>(inner: T, config: &RenoConfig) -> Self {
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
        let transport = Retrying::new(
            RateLimited::new(inner, limiter.clone()),
            RetryPolicy::from(&config.retry),
        );
        Self {
            transport: Box::new(transport),
            limiter,
        }
    }

    /// Send one operation and return its `data` payload.
    pub async fn execute(&self, operation: &str, query: &str, variables: Value) -> Result<Value> {
        debug!(operation, "Executing API operation");
        let request = GraphQlRequest::new(operation, query, variables);
        self.transport.send(&request).await
    }

    pub async fn rate_limit_status(&self) -> RateLimitStatus {
        self.limiter.status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockReply, MockTransport};
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_execute_goes_through_all_layers() {
        let mock = MockTransport::new().with_sequence(
            "me",
            vec![
                MockReply::Network("reset".into()),
                MockReply::Data(json!({"me": {"id": "7", "name": "Sam"}})),
            ],
        );
        let client = ApiClient::with_transport(mock.clone(), &RenoConfig::default());

        let data = client
            .execute("me", "query { me { id name } }", json!({}))
            .await
            .unwrap();
        assert_eq!(data["me"]["name"], "Sam");
        assert_eq!(mock.calls().len(), 2);

        let status = client.rate_limit_status().await;
        assert_eq!(status.in_window, 2);
        assert_eq!(status.remaining, 33);
    }
}
