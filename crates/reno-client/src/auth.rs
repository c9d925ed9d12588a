//! API token lookup
//!
//! Priority:
//! 1. The variable named by `api.token_env` in the config
//! 2. MONDAY_API_TOKEN

use reno_core::config::ApiConfig;
use reno_core::{RenoError, Result};
use std::env;

pub const FALLBACK_TOKEN_ENV: &str = "MONDAY_API_TOKEN";

/// Get the API token for the work-management service
pub fn get_api_token(config: &ApiConfig) -> Result<String> {
    for var in [config.token_env.as_str(), FALLBACK_TOKEN_ENV] {
        if let Ok(token) = env::var(var) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                tracing::info!("Using API token from {}", var);
                return Ok(token);
            }
        }
    }

    Err(RenoError::Auth(format!(
        "No API token found. Set {} or {}",
        config.token_env, FALLBACK_TOKEN_ENV
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to prevent concurrent env var modifications
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_LOCK.lock().unwrap();

        let originals: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();

        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let result = f();

        for (key, original) in originals {
            match original {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        result
    }

    fn config() -> ApiConfig {
        ApiConfig {
            token_env: "RENO_TEST_TOKEN".to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_configured_var_takes_priority() {
        with_env_vars(
            &[
                ("RENO_TEST_TOKEN", Some("configured")),
                (FALLBACK_TOKEN_ENV, Some("fallback")),
            ],
            || assert_eq!(get_api_token(&config()).unwrap(), "configured"),
        );
    }

    #[test]
    fn test_fallback_var() {
        with_env_vars(
            &[
                ("RENO_TEST_TOKEN", Some("   ")),
                (FALLBACK_TOKEN_ENV, Some("fallback")),
            ],
            || assert_eq!(get_api_token(&config()).unwrap(), "fallback"),
        );
    }

    #[test]
    fn test_no_token() {
        with_env_vars(
            &[("RENO_TEST_TOKEN", None), (FALLBACK_TOKEN_ENV, None)],
            || {
                let err = get_api_token(&config()).unwrap_err();
                assert!(matches!(err, RenoError::Auth(_)));
            },
        );
    }
}
