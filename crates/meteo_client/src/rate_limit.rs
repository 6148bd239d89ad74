//! Process-wide rate limiter for provider calls.
//!
//! Every outbound request across the forecast, marine, and SST
//! endpoints goes through one shared limiter, so worker concurrency
//! controls I/O overlap but never the request rate.

use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

const DEFAULT_CALLS_PER_MINUTE: u32 = 30;

#[derive(Debug, Clone)]
pub struct RateLimiter {
    limiter: Arc<
        GovLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::per_minute(DEFAULT_CALLS_PER_MINUTE)
    }

    /// Create with a custom per-minute ceiling.
    pub fn per_minute(calls: u32) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(calls.max(1)).expect("calls_per_minute is at least 1"),
        );
        Self {
            limiter: Arc::new(GovLimiter::direct(quota)),
        }
    }

    /// Wait until a dispatch slot is available.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a slot without waiting. Returns true if acquired.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_is_bounded_by_quota() {
        let limiter = RateLimiter::per_minute(5);
        let granted = (0..10).filter(|_| limiter.try_acquire()).count();
        assert!(granted <= 5, "granted {granted} of a 5/min quota");
        assert!(granted >= 1);
    }
}
