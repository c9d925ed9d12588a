//! GraphQL request envelope

use serde::Serialize;
use serde_json::Value;

/// A query or mutation with its variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    /// Short operation name used for logging and mock matching; not sent
    #[serde(skip)]
    pub operation: String,
    pub query: String,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(operation: impl Into<String>, query: impl Into<String>, variables: Value) -> Self {
        Self {
            operation: operation.into(),
            query: query.into(),
            variables,
        }
    }
}
