//! Scripted transport for tests and dry runs

use async_trait::async_trait;
use reno_core::{RenoError, Result};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::classify::classify;
use crate::request::GraphQlRequest;
use crate::transport::Transport;

/// One scripted response
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful `data` payload
    Data(Value),
    /// Structured error envelope in a 200 response
    ApiError { code: String, message: String },
    /// Raw HTTP status and body
    Status {
        status: u16,
        body: String,
        retry_after: Option<Duration>,
    },
    /// Transport-level failure
    Network(String),
}

impl MockReply {
    fn resolve(self) -> Result<Value> {
        match self {
            Self::Data(data) => Ok(data),
            Self::ApiError { code, message } => {
                let body = json!({"errors": [{"message": message, "extensions": {"code": code}}]});
                classify(200, None, &body.to_string())
            }
            Self::Status {
                status,
                body,
                retry_after,
            } => classify(status, retry_after, &body),
            Self::Network(message) => Err(RenoError::Network(message)),
        }
    }
}

type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

struct Rule {
    operation: String,
    predicate: Option<Predicate>,
    /// Consumed front to back; the last reply repeats
    replies: VecDeque<MockReply>,
}

impl Rule {
    fn matches(&self, request: &GraphQlRequest) -> bool {
        self.operation == request.operation
            && self
                .predicate
                .as_ref()
                .map_or(true, |p| p(&request.variables))
    }

    fn next_reply(&mut self) -> Option<MockReply> {
        if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        }
    }
}

/// A request the mock received
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub variables: Value,
    pub at: Instant,
}

#[derive(Default)]
struct MockState {
    rules: Vec<Rule>,
    calls: Vec<RecordedCall>,
}

/// Transport that answers from a script and records every call
///
/// Rules are matched by operation name, most recently added first, so a
/// narrow rule registered after a general one takes precedence. Clones share
/// the same script and call log.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `operation` request with `reply`.
    pub fn with_reply(self, operation: &str, reply: MockReply) -> Self {
        self.with_sequence(operation, vec![reply])
    }

    /// Answer successive `operation` requests in order, repeating the last reply.
    pub fn with_sequence(self, operation: &str, replies: Vec<MockReply>) -> Self {
        self.push_rule(operation, None, replies)
    }

    /// Answer `operation` requests whose variables satisfy `predicate`.
    pub fn with_reply_when<F>(self, operation: &str, predicate: F, reply: MockReply) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.push_rule(operation, Some(Box::new(predicate)), vec![reply])
    }

    fn push_rule(self, operation: &str, predicate: Option<Predicate>, replies: Vec<MockReply>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.rules.push(Rule {
                operation: operation.to_string(),
                predicate,
                replies: replies.into(),
            });
        }
        self
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    /// Calls for one operation
    pub fn calls_for(&self, operation: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation == operation)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &GraphQlRequest) -> Result<Value> {
        let reply = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| RenoError::Other("mock transport lock poisoned".to_string()))?;
            state.calls.push(RecordedCall {
                operation: request.operation.clone(),
                variables: request.variables.clone(),
                at: Instant::now(),
            });
            state
                .rules
                .iter_mut()
                .rev()
                .find(|rule| rule.matches(request))
                .and_then(Rule::next_reply)
        };

        match reply {
            Some(reply) => reply.resolve(),
            None => Err(RenoError::Other(format!(
                "No mock reply for: {}",
                request.operation
            ))),
        }
    }
}
