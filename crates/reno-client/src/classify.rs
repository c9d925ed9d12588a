//! Response classification
//!
//! Maps a raw HTTP status and body onto the error taxonomy: 429 becomes
//! `RateLimited`, other non-2xx statuses become `Http`, and a structured
//! error envelope inside a 2xx body becomes `Domain` (or `RateLimited` for
//! the service's complexity budget errors).

use reno_core::{DomainError, RenoError, Result};
use serde_json::Value;
use std::time::Duration;

/// Error codes the service uses for per-minute budget exhaustion
const BUDGET_CODES: &[&str] = &[
    "ComplexityException",
    "COMPLEXITY_BUDGET_EXHAUSTED",
    "RATE_LIMIT_EXCEEDED",
    "Rate Limit Exceeded",
];

const MAX_MESSAGE_LEN: usize = 300;

/// Classify a response, returning the `data` payload on success.
pub fn classify(status: u16, retry_after: Option<Duration>, body: &str) -> Result<Value> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if status == 429 {
        return Err(RenoError::RateLimited {
            retry_after,
            message: parsed
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| "Rate limit exceeded".to_string()),
        });
    }

    if !(200..300).contains(&status) {
        let message = parsed
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| truncate(body));
        return Err(RenoError::Http { status, message });
    }

    let parsed = parsed.ok_or_else(|| RenoError::Http {
        status,
        message: format!("Response is not valid JSON: {}", truncate(body)),
    })?;

    if let Some(err) = envelope_error(&parsed) {
        return Err(err);
    }

    match parsed.get("data") {
        Some(data) if !data.is_null() => Ok(data.clone()),
        _ => Err(RenoError::Http {
            status,
            message: "Response contained no data".to_string(),
        }),
    }
}

/// Structured error inside a successful response, if any
fn envelope_error(body: &Value) -> Option<RenoError> {
    let (code, message, retry_hint) = if let Some(first) = body
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        let extensions = first.get("extensions");
        let code = extensions
            .and_then(|ext| ext.get("code").or_else(|| ext.get("error_code")))
            .and_then(Value::as_str)
            .map(str::to_string);
        let message = first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown API error")
            .to_string();
        let retry_hint = extensions
            .and_then(|ext| ext.get("retry_in_seconds"))
            .and_then(Value::as_u64);
        (code, message, retry_hint)
    } else if let Some(code) = body.get("error_code").and_then(Value::as_str) {
        let message = body
            .get("error_message")
            .and_then(Value::as_str)
            .unwrap_or(code)
            .to_string();
        (Some(code.to_string()), message, None)
    } else {
        return None;
    };

    if code.as_deref().is_some_and(|c| BUDGET_CODES.contains(&c)) {
        return Some(RenoError::RateLimited {
            retry_after: retry_hint.map(Duration::from_secs),
            message,
        });
    }

    Some(RenoError::Domain(DomainError::new(code, message)))
}

fn error_message(body: &Value) -> Option<String> {
    body.get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|e| e.get("message"))
        .or_else(|| body.get("error_message"))
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_MESSAGE_LEN).collect()
}
