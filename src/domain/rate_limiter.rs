//! Per-client token-bucket rate limiting.
//!
//! One bucket per client key, all behind a single table-wide lock. The lock
//! makes each admission check atomic: lookup, lazy refill, token consumption
//! and the activity timestamp update happen as one unit, so concurrent
//! checks for the same key can never over-admit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

struct VisitorBucket {
    tokens: f64,
    last_refill: Instant,
    last_active: Instant,
}

/// Token-bucket admission control keyed by client (e.g. IP address).
///
/// A bucket starts full on first sight of a key, refills continuously at
/// `rate` tokens per second up to `burst`, and pays one token per admitted
/// request. Refill is computed lazily from elapsed time; there is no timer
/// per bucket. Tokens always stay within `[0, burst]`.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, VisitorBucket>>,
    rate: f64,
    burst: u32,
}

impl RateLimiter {
    pub fn new(rate: f64, burst: u32) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            rate,
            burst,
        }
    }

    /// Decides whether a request from `client_key` is admitted.
    ///
    /// Never errors and never blocks beyond the table lock; a denied caller
    /// is expected to answer 429 upstream. The bucket's activity timestamp
    /// is refreshed regardless of the outcome, so a client hammering past
    /// its budget is not evicted while still active.
    pub fn allow(&self, client_key: &str) -> bool {
        let now = Instant::now();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let bucket = buckets
            .entry(client_key.to_string())
            .or_insert_with(|| VisitorBucket {
                tokens: self.burst as f64,
                last_refill: now,
                last_active: now,
            });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate).min(self.burst as f64);
        bucket.last_refill = now;
        bucket.last_active = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Removes buckets idle for longer than `idle_for`; returns how many.
    ///
    /// Takes the same table lock as [`allow`](Self::allow), so the sweep
    /// never races an in-flight admission check.
    pub fn sweep_idle(&self, idle_for: Duration) -> usize {
        let now = Instant::now();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let before = buckets.len();
        buckets.retain(|_, bucket| now.duration_since(bucket.last_active) <= idle_for);
        before - buckets.len()
    }
}

/// Periodically evicts idle buckets so spoofed or rotating client keys do
/// not grow the table without bound.
///
/// The sweep interval doubles as the idle threshold: a bucket untouched for
/// one full interval is dropped on the next wakeup.
pub async fn run_bucket_sweeper(limiter: Arc<RateLimiter>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // the first tick fires immediately

    loop {
        ticker.tick().await;
        let removed = limiter.sweep_idle(every);
        if removed > 0 {
            tracing::debug!(removed, "evicted idle rate-limit buckets");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn burst_is_consumed_one_token_per_request() {
        let limiter = RateLimiter::new(1.0, 3);

        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn clients_have_independent_buckets() {
        let limiter = RateLimiter::new(1.0, 1);

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.2"));
    }

    #[test]
    fn tokens_refill_after_waiting() {
        let limiter = RateLimiter::new(1.0, 1);

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));

        thread::sleep(Duration::from_millis(1050));
        assert!(limiter.allow("10.0.0.1"));
    }

    #[test]
    fn refill_never_exceeds_burst() {
        let limiter = RateLimiter::new(1000.0, 2);

        assert!(limiter.allow("10.0.0.1"));
        thread::sleep(Duration::from_millis(50));

        // A long pause at a high rate still leaves only `burst` tokens.
        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn sweep_removes_only_idle_buckets() {
        let limiter = RateLimiter::new(1.0, 1);

        limiter.allow("stale");
        thread::sleep(Duration::from_millis(40));
        limiter.allow("fresh");

        let removed = limiter.sweep_idle(Duration::from_millis(20));
        assert_eq!(removed, 1);

        let buckets = limiter.buckets.lock().unwrap();
        assert!(!buckets.contains_key("stale"));
        assert!(buckets.contains_key("fresh"));
    }

    #[test]
    fn denied_requests_still_count_as_activity() {
        let limiter = RateLimiter::new(1.0, 1);

        limiter.allow("10.0.0.1");
        thread::sleep(Duration::from_millis(40));
        assert!(!limiter.allow("10.0.0.1")); // denied, but refreshes last_active

        assert_eq!(limiter.sweep_idle(Duration::from_millis(20)), 0);
    }

    #[tokio::test]
    async fn concurrent_checks_never_over_admit() {
        let limiter = Arc::new(RateLimiter::new(0.0, 100));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::task::spawn_blocking(move || {
                (0..50).filter(|_| limiter.allow("shared")).count()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            admitted += handle.await.unwrap();
        }

        assert_eq!(admitted, 100);
    }
}
