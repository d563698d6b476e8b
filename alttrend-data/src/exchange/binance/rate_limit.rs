use alttrend_integration::rate_limit::RateLimiter;
use std::time::Duration;

/// Binance REST request-weight budget.
///
/// See docs: <https://developers.binance.com/docs/binance-spot-api-docs/rest-api/limits>
#[derive(Debug, Clone)]
pub struct BinanceRateLimit {
    rest: RateLimiter,
}

impl BinanceRateLimit {
    /// Create a new [`BinanceRateLimit`] allowing `weight_per_minute` units of request weight.
    pub fn new(weight_per_minute: usize) -> Self {
        Self::with_params(weight_per_minute, Duration::from_secs(60))
    }

    /// Create a custom [`BinanceRateLimit`] with the provided quota for testing.
    pub fn with_params(capacity: usize, interval: Duration) -> Self {
        Self {
            rest: RateLimiter::new(capacity, interval),
        }
    }

    /// Wait for, and consume, `weight` units of the REST budget.
    pub async fn acquire(&self, weight: usize) {
        self.rest.acquire(weight).await;
    }

    /// Report a REST rate limit violation (HTTP 429 / 418).
    pub async fn report_violation(&self) {
        self.rest.report_violation().await;
    }

    /// Return to the base refill interval after a successful request.
    pub async fn reset_backoff(&self) {
        self.rest.reset_backoff().await;
    }

    /// Current refill interval, including any backoff.
    pub async fn interval(&self) -> Duration {
        self.rest.interval().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_rest_weight_exhaustion() {
        let rl = BinanceRateLimit::with_params(4, Duration::from_millis(40));
        rl.acquire(2).await;
        rl.acquire(2).await;
        let start = Instant::now();
        rl.acquire(2).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_violation_backoff_and_reset() {
        let rl = BinanceRateLimit::with_params(1, Duration::from_millis(20));
        rl.report_violation().await;
        assert_eq!(rl.interval().await, Duration::from_millis(40));
        rl.reset_backoff().await;
        assert_eq!(rl.interval().await, Duration::from_millis(20));
    }
}
