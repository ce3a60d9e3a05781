//! Client-side throttling of page fetches
//!
//! A governor token bucket. Clones share the bucket, so one limiter can sit
//! in front of both the async and the blocking client.

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Requests per second plus burst, as written in config files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained fetch rate
    pub requests_per_second: u32,
    /// Fetches allowed back to back before throttling starts
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_burst() -> u32 {
    1
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new(10, 10)
    }
}

impl RateLimiterConfig {
    /// Rate and burst as given; zeroes are raised when the quota is built
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// Governor quota; zero values are raised to one
    pub fn quota(&self) -> Quota {
        let rate = NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(rate).allow_burst(burst)
    }
}

/// Shared token bucket
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<DirectLimiter>,
    clock: DefaultClock,
    quota: Quota,
}

impl RateLimiter {
    /// Fresh bucket for `config`
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self::from_quota(config.quota())
    }

    /// Build from a ready-made governor quota
    pub fn from_quota(quota: Quota) -> Self {
        let clock = DefaultClock::default();
        Self {
            bucket: Arc::new(governor::RateLimiter::direct_with_clock(quota, &clock)),
            clock,
            quota,
        }
    }

    /// Suspend until the next fetch may go out
    pub async fn wait(&self) {
        self.bucket.until_ready().await;
    }

    /// Sleep the current thread until the next fetch may go out
    pub fn wait_blocking(&self) {
        while let Err(not_until) = self.bucket.check() {
            std::thread::sleep(not_until.wait_time_from(self.clock.now()));
        }
    }

    /// Take a token if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("burst", &self.quota.burst_size())
            .field("period", &self.quota.replenish_interval())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    #[test]
    fn test_config_defaults_and_burst_fallback() {
        assert_eq!(RateLimiterConfig::default(), RateLimiterConfig::new(10, 10));

        let parsed: RateLimiterConfig =
            serde_json::from_str(r#"{"requests_per_second": 5}"#).unwrap();
        assert_eq!(parsed, RateLimiterConfig::new(5, 1));
    }

    #[test]
    fn test_zero_values_do_not_panic() {
        let quota = RateLimiterConfig::new(0, 0).quota();
        assert_eq!(quota.burst_size().get(), 1);
        assert_eq!(quota.replenish_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_burst_then_throttle() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(10, 3));

        let granted = (0..4).filter(|_| limiter.try_acquire()).count();
        assert_eq!(granted, 3);
    }

    #[test]
    fn test_clones_share_bucket() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(1, 1));
        let other = limiter.clone();

        assert!(limiter.try_acquire());
        assert!(!other.try_acquire());
    }

    #[tokio::test]
    async fn test_wait_within_burst_is_immediate() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(100, 10));
        let started = Instant::now();

        for _ in 0..10 {
            limiter.wait().await;
        }
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_wait_blocking_spaces_fetches() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(50, 1));
        let started = Instant::now();

        limiter.wait_blocking();
        limiter.wait_blocking();

        // One replenish period is 20ms
        assert!(started.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_wait_blocking_sleeps_about_one_period_per_token() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(20, 2));
        let started = Instant::now();

        for _ in 0..4 {
            limiter.wait_blocking();
        }

        // Two burst tokens, then two refills at 50ms each
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(80));
        assert!(elapsed < Duration::from_secs(1));
    }
}
