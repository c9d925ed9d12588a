//! Fail-open helpers for best-effort work
//!
//! Use these where a failure should degrade the run instead of aborting it:
//! progress delivery, optional board columns, enrichment bookkeeping.
//!
//! DO NOT use fail-open for:
//! - Board or group creation (items depend on them)
//! - Verification (correctness)

use std::future::Future;
use tracing::warn;

use crate::Result;

/// Run an async operation, logging and discarding its error.
///
/// ```no_run
/// use reno_core::fail_open::fail_open;
/// use reno_core::Result;
///
/// async fn create_optional_column() -> Result<String> {
///     Ok("status".to_string())
/// }
///
/// async fn example() {
///     let column = fail_open("create_column", || create_optional_column()).await;
///     // column is None if creation failed
/// }
/// ```
pub async fn fail_open<F, Fut, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match f().await {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}

/// Synchronous variant of [`fail_open`].
pub fn fail_open_sync<F, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}
