//! Reno Client - resilient access to the work-management API
//!
//! Every remote call goes through the same pipeline:
//!
//! ```text
//! rate limiter -> transport send -> response classification -> retry/backoff
//! ```
//!
//! The layers are separate [`Transport`] implementations composed by
//! [`ApiClient`], so tests can swap the HTTP layer for [`MockTransport`].

pub mod auth;
pub mod classify;
pub mod client;
pub mod enhancer;
pub mod mock;
pub mod rate_limiter;
pub mod request;
pub mod transport;

pub use auth::get_api_token;
pub use classify::classify;
pub use client::ApiClient;
pub use enhancer::HttpEnhancer;
pub use mock::{MockReply, MockTransport, RecordedCall};
pub use rate_limiter::{RateLimitStatus, RateLimiter};
pub use request::GraphQlRequest;
pub use transport::{HttpTransport, RateLimited, RetryPolicy, Retrying, Transport};
