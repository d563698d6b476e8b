use alttrend_integration::error::SocketError;
use thiserror::Error;

/// All errors generated in `alttrend-notify`.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("notification API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("rate limited by notification API, retry after {retry_after:?}s")]
    RateLimited { retry_after: Option<u64> },

    #[error("failed to read chart artifact: {0}")]
    Artifact(#[from] std::io::Error),

    #[error("SocketError: {0}")]
    Socket(#[from] SocketError),
}
