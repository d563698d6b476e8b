use std::sync::Arc;
use std::time::Duration;
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, warn};

#[derive(Debug)]
struct Inner {
    capacity: usize,
    tokens: usize,
    interval: Duration,
    base_interval: Duration,
    max_interval: Duration,
    last_refill: Instant,
}

impl Inner {
    fn refill(&mut self, now: Instant) {
        if now.duration_since(self.last_refill) >= self.interval {
            self.tokens = self.capacity;
            self.last_refill = now;
        }
    }

    fn until_refill(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.duration_since(self.last_refill))
    }
}

/// Token bucket rate limiter with adaptive backoff.
///
/// Holds `capacity` units of request weight that are fully replenished every `interval`. Each
/// reported violation doubles the interval (up to 16x the base interval) until
/// [`reset_backoff`](Self::reset_backoff) is called.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<Inner>>,
}

impl RateLimiter {
    /// Construct a new [`RateLimiter`] allowing `capacity` units of weight every `interval`.
    pub fn new(capacity: usize, interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                capacity,
                tokens: capacity,
                interval,
                base_interval: interval,
                max_interval: interval * 16,
                last_refill: Instant::now(),
            })),
        }
    }

    /// Wait until `weight` units are available and consume them.
    ///
    /// A `weight` larger than the capacity is clamped to the capacity so that the caller waits
    /// for a full bucket instead of forever.
    pub async fn acquire(&self, weight: usize) {
        loop {
            let wait = {
                let mut inner = self.inner.lock().await;
                let weight = weight.min(inner.capacity);
                let now = Instant::now();
                inner.refill(now);

                if inner.tokens >= weight {
                    inner.tokens -= weight;
                    return;
                }

                inner.until_refill(now)
            };

            debug!(weight, ?wait, "RateLimiter budget exhausted, waiting for refill");
            tokio::time::sleep(wait).await;
        }
    }

    /// Report a rate limit violation to trigger backoff.
    pub async fn report_violation(&self) {
        let mut inner = self.inner.lock().await;
        inner.interval = std::cmp::min(inner.interval * 2, inner.max_interval);
        inner.tokens = 0;
        warn!(interval = ?inner.interval, "RateLimiter violation reported, backing off");
    }

    /// Reset the current backoff to the base interval.
    pub async fn reset_backoff(&self) {
        let mut inner = self.inner.lock().await;
        inner.interval = inner.base_interval;
    }

    /// Current refill interval, including any backoff.
    pub async fn interval(&self) -> Duration {
        self.inner.lock().await.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limit_basic() {
        let rl = RateLimiter::new(2, Duration::from_millis(50));
        rl.acquire(1).await;
        rl.acquire(1).await;
        let start = Instant::now();
        rl.acquire(1).await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_weighted_acquire() {
        let rl = RateLimiter::new(20, Duration::from_millis(50));
        rl.acquire(15).await;
        let start = Instant::now();
        rl.acquire(10).await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_weight_above_capacity_is_clamped() {
        let rl = RateLimiter::new(5, Duration::from_millis(30));
        let start = Instant::now();
        rl.acquire(50).await;
        assert!(start.elapsed() < Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_adaptive_backoff() {
        let rl = RateLimiter::new(1, Duration::from_millis(30));
        rl.acquire(1).await;
        rl.report_violation().await;
        assert_eq!(rl.interval().await, Duration::from_millis(60));

        let start = Instant::now();
        rl.acquire(1).await;
        assert!(start.elapsed() >= Duration::from_millis(50));

        rl.reset_backoff().await;
        assert_eq!(rl.interval().await, Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_backoff_is_capped() {
        let rl = RateLimiter::new(1, Duration::from_millis(10));
        for _ in 0..10 {
            rl.report_violation().await;
        }
        assert_eq!(rl.interval().await, Duration::from_millis(160));
    }
}
