//! Sliding-window rate limiter
//!
//! Admits at most `max_requests` calls in any `window`. A caller that finds
//! the window full sleeps until the oldest entry expires, then re-checks,
//! since other callers may have taken the freed slot in the meantime.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Snapshot of limiter state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitStatus {
    pub max_requests: usize,
    pub in_window: usize,
    pub remaining: usize,
    /// Callers currently waiting for a slot
    pub waiting: usize,
    /// Time until the oldest entry leaves the window
    pub next_slot_in: Option<Duration>,
}

impl RateLimitStatus {
    pub fn throttled(&self) -> bool {
        self.waiting > 0
    }
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
    waiting: AtomicUsize,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            admitted: Mutex::new(VecDeque::new()),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Build a limiter from the `[rate_limit]` config section.
    pub fn from_config(config: &reno_core::config::RateLimitConfig) -> Self {
        Self::new(config.requests_per_minute, config.window())
    }

    /// Wait until a request may be sent, then record it.
    pub async fn admit(&self) {
        loop {
            let wait = {
                let mut admitted = self.admitted.lock().await;
                let now = Instant::now();
                self.prune(&mut admitted, now);

                if admitted.len() < self.max_requests {
                    admitted.push_back(now);
                    return;
                }

                match admitted.front() {
                    Some(oldest) => (*oldest + self.window).saturating_duration_since(now),
                    None => Duration::ZERO,
                }
            };

            debug!(wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting");
            let _waiting = WaitGuard::enter(&self.waiting);
            tokio::time::sleep(wait).await;
        }
    }

    pub async fn status(&self) -> RateLimitStatus {
        let mut admitted = self.admitted.lock().await;
        let now = Instant::now();
        self.prune(&mut admitted, now);

        RateLimitStatus {
            max_requests: self.max_requests,
            in_window: admitted.len(),
            remaining: self.max_requests.saturating_sub(admitted.len()),
            waiting: self.waiting.load(Ordering::SeqCst),
            next_slot_in: admitted
                .front()
                .map(|oldest| (*oldest + self.window).saturating_duration_since(now)),
        }
    }

    fn prune(&self, admitted: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = admitted.front() {
            if now.duration_since(*oldest) >= self.window {
                admitted.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Counts one waiter for as long as it is alive, including when the
/// `admit` future is dropped mid-sleep.
struct WaitGuard<'a>(&'a AtomicUsize);

impl<'a> WaitGuard<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
