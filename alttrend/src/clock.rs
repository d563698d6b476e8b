use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

/// Defines how the [`Scanner`](crate::scanner::Scanner) waits between cycles.
#[async_trait]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Live [`Sleeper`] using `tokio::time::sleep`.
#[derive(Debug, Copy, Clone, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

/// [`Sleeper`] that returns immediately, recording every requested [`Duration`].
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    pub sleeps: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
    }
}
