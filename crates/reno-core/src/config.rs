//! Configuration management for Reno
//!
//! Project-level settings for the remote API, request pacing, retry policy,
//! board creation and step enhancement.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{RenoError, Result};

/// Project-level Reno configuration
///
/// Loaded from `.reno/config.toml` in the project root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenoConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub creation: CreationConfig,

    #[serde(default)]
    pub enhancement: EnhancementConfig,
}

/// Remote API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Sent as the `API-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Sliding-window request pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: usize,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

/// Retry policy for retryable failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff is `base_delay_ms * 2^attempt`
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

/// Board creation behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,

    /// Items fetched when verifying the finished board
    #[serde(default = "default_verify_sample")]
    pub verify_sample: usize,

    #[serde(default = "default_board_kind")]
    pub board_kind: String,

    /// Break templated scopes into one item per step
    #[serde(default = "default_true")]
    pub step_breakdowns: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
}

/// Step enhancement collaborator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_enhancement_timeout_secs")]
    pub timeout_secs: u64,

    /// Enrichment service URL; enhancement is unavailable without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

// Default value providers
fn default_endpoint() -> String {
    "https://api.monday.com/v2".to_string()
}

fn default_api_version() -> String {
    "2025-01".to_string()
}

fn default_token_env() -> String {
    "RENO_API_TOKEN".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_requests_per_minute() -> usize {
    35
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_pause_ms() -> u64 {
    500
}

fn default_verify_sample() -> usize {
    5
}

fn default_board_kind() -> String {
    "public".to_string()
}

fn default_enhancement_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_version: default_api_version(),
            token_env: default_token_env(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            window_secs: default_window_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_pause_ms: default_batch_pause_ms(),
            verify_sample: default_verify_sample(),
            board_kind: default_board_kind(),
            step_breakdowns: true,
            workspace_id: None,
        }
    }
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_enhancement_timeout_secs(),
            endpoint: None,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl CreationConfig {
    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }
}

impl EnhancementConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RenoConfig {
    /// Load configuration from `.reno/config.toml` or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(".reno/config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&content)
                .map_err(|e| RenoError::Config(format!("Failed to parse config file: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `.reno/config.toml`
    pub fn write_default(root: &Path) -> Result<()> {
        let config_dir = root.join(".reno");
        std::fs::create_dir_all(&config_dir)?;

        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| RenoError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(config_dir.join("config.toml"), content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.requests_per_minute == 0 {
            return Err(RenoError::Config(
                "rate_limit.requests_per_minute must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(RenoError::Config(
                "rate_limit.window_secs must be at least 1".to_string(),
            ));
        }
        if self.creation.batch_size == 0 {
            return Err(RenoError::Config(
                "creation.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
