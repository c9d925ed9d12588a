//! Unified error types for Reno

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Message fragments that mark an otherwise fatal HTTP failure as transient.
const RETRYABLE_MESSAGE_HINTS: &[&str] = &[
    "network error",
    "timeout",
    "timed out",
    "econnreset",
    "enotfound",
    "econnrefused",
];

/// Unified error type for all Reno operations
#[derive(Error, Debug)]
pub enum RenoError {
    // Selection / plan errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited: {message}")]
    RateLimited {
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Gave up after {attempts} attempts: {last}")]
    ExhaustedRetries { attempts: u32, last: Box<RenoError> },

    // Orchestration errors
    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Run cancelled before stage '{0}'")]
    Cancelled(String),

    // Setup errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl RenoError {
    /// Whether the retry layer may attempt the failed request again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } => true,
            Self::Http { message, .. } => {
                let lower = message.to_lowercase();
                RETRYABLE_MESSAGE_HINTS.iter().any(|hint| lower.contains(hint))
            }
            _ => false,
        }
    }

    /// Server-provided delay hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// The innermost error, unwrapping retry exhaustion.
    pub fn root(&self) -> &RenoError {
        match self {
            Self::ExhaustedRetries { last, .. } => last.root(),
            other => other,
        }
    }

    /// The structured API error behind this failure, if there is one.
    pub fn domain(&self) -> Option<&DomainError> {
        match self.root() {
            Self::Domain(err) => Some(err),
            _ => None,
        }
    }
}

/// Known categories of structured API errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainErrorKind {
    Unauthorized,
    InvalidReference,
    ItemLimitExceeded,
    InvalidColumnValue,
    Unknown,
}

impl DomainErrorKind {
    /// Map an API error code to its category.
    pub fn from_code(code: &str) -> Self {
        match code {
            "UserUnauthorizedException" | "Unauthorized" | "USER_UNAUTHORIZED"
            | "UNAUTHENTICATED" => Self::Unauthorized,
            "InvalidBoardIdException"
            | "InvalidGroupIdException"
            | "InvalidItemIdException"
            | "InvalidColumnIdException"
            | "InvalidWorkspaceIdException"
            | "ResourceNotFoundException" => Self::InvalidReference,
            "ItemsLimitationException" => Self::ItemLimitExceeded,
            "ColumnValueException" | "InvalidColumnValueException" => Self::InvalidColumnValue,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for DomainErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::InvalidReference => write!(f, "invalid_reference"),
            Self::ItemLimitExceeded => write!(f, "item_limit_exceeded"),
            Self::InvalidColumnValue => write!(f, "invalid_column_value"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A structured error returned inside an API response envelope
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("API error ({kind}): {message}")]
pub struct DomainError {
    pub kind: DomainErrorKind,
    pub code: Option<String>,
    pub message: String,
}

impl DomainError {
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        let kind = code
            .as_deref()
            .map(DomainErrorKind::from_code)
            .unwrap_or(DomainErrorKind::Unknown);
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    /// Short, actionable message for the user. `None` for unmapped codes.
    pub fn user_message(&self) -> Option<&'static str> {
        match self.kind {
            DomainErrorKind::Unauthorized => {
                Some("Authentication failed. Please check your API token.")
            }
            DomainErrorKind::InvalidReference => {
                Some("A board, group or workspace id was rejected. Please check your workspace ID.")
            }
            DomainErrorKind::ItemLimitExceeded => {
                Some("Board item limit exceeded (10,000 items max per board).")
            }
            DomainErrorKind::InvalidColumnValue => {
                Some("Invalid column value format. Please check your data.")
            }
            DomainErrorKind::Unknown => None,
        }
    }
}

/// Result type alias using RenoError
pub type Result<T> = std::result::Result<T, RenoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_retryable() {
        assert!(RenoError::Network("connection refused".into()).is_retryable());
        assert!(RenoError::RateLimited {
            retry_after: None,
            message: "slow down".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_http_errors_retry_only_on_message_hint() {
        let plain = RenoError::Http {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert!(!plain.is_retryable());

        let hinted = RenoError::Http {
            status: 502,
            message: "upstream ECONNRESET".into(),
        };
        assert!(hinted.is_retryable());
    }

    #[test]
    fn test_domain_code_mapping() {
        let err = DomainError::new(Some("ItemsLimitationException".into()), "too many");
        assert_eq!(err.kind, DomainErrorKind::ItemLimitExceeded);
        assert!(err.user_message().is_some());

        let unknown = DomainError::new(Some("SomethingElse".into()), "odd");
        assert_eq!(unknown.kind, DomainErrorKind::Unknown);
        assert!(unknown.user_message().is_none());

        let missing = DomainError::new(None, "no code");
        assert_eq!(missing.kind, DomainErrorKind::Unknown);
    }

    #[test]
    fn test_root_unwraps_exhausted_retries() {
        let err = RenoError::ExhaustedRetries {
            attempts: 4,
            last: Box::new(RenoError::Domain(DomainError::new(
                Some("UserUnauthorizedException".into()),
                "bad token",
            ))),
        };
        assert!(matches!(err.root(), RenoError::Domain(_)));
        assert_eq!(err.domain().unwrap().kind, DomainErrorKind::Unauthorized);
        assert!(!err.is_retryable());
    }
}
