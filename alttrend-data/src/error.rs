use alttrend_integration::error::SocketError;
use thiserror::Error;

/// All errors generated in `alttrend-data`.
///
/// Every variant is recoverable: the scanner logs it and moves on to the next pair.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("rate limited by exchange (status={status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("exchange API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("invalid candle limit {0}: must be within 1..=1000")]
    InvalidLimit(usize),

    #[error("exchange returned no candles")]
    Empty,

    #[error("insufficient candles: expected {expected}, received {received}")]
    Insufficient { expected: usize, received: usize },

    #[error("candles out of order: open_time {current} does not follow {previous}")]
    OutOfOrder {
        previous: chrono::DateTime<chrono::Utc>,
        current: chrono::DateTime<chrono::Utc>,
    },

    #[error("SocketError: {0}")]
    Socket(SocketError),
}

impl RetrievalError {
    /// Determine if the exchange rejected the request due to its rate limits.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, RetrievalError::RateLimited { .. })
    }
}

impl From<SocketError> for RetrievalError {
    fn from(error: SocketError) -> Self {
        match error {
            SocketError::HttpTimeout(_) => Self::Timeout,
            SocketError::HttpResponse(status, message)
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.as_u16() == 418 =>
            {
                Self::RateLimited {
                    status: status.as_u16(),
                    message,
                }
            }
            error => Self::Socket(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_from_socket_error() {
        struct TestCase {
            input: SocketError,
            expected_rate_limit: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: html 429 page is a rate limit
                input: SocketError::HttpResponse(
                    reqwest::StatusCode::TOO_MANY_REQUESTS,
                    "slow down".to_string(),
                ),
                expected_rate_limit: true,
            },
            TestCase {
                // TC1: 418 ip ban is a rate limit
                input: SocketError::HttpResponse(
                    reqwest::StatusCode::IM_A_TEAPOT,
                    String::new(),
                ),
                expected_rate_limit: true,
            },
            TestCase {
                // TC2: gateway error is not
                input: SocketError::HttpResponse(
                    reqwest::StatusCode::BAD_GATEWAY,
                    String::new(),
                ),
                expected_rate_limit: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = RetrievalError::from(test.input).is_rate_limit();
            assert_eq!(actual, test.expected_rate_limit, "TC{} failed", index);
        }
    }
}
