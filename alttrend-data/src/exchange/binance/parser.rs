use crate::error::RetrievalError;
use alttrend_integration::protocol::http::HttpParser;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Binance REST [`HttpParser`].
#[derive(Debug, Copy, Clone, Default)]
pub struct BinanceParser;

impl HttpParser for BinanceParser {
    type ApiError = BinanceApiError;
    type OutputError = RetrievalError;

    fn parse_api_error(&self, status: StatusCode, error: Self::ApiError) -> Self::OutputError {
        if is_rate_limit_status(status) {
            RetrievalError::RateLimited {
                status: status.as_u16(),
                message: error.msg,
            }
        } else {
            RetrievalError::Api {
                code: error.code,
                message: error.msg,
            }
        }
    }
}

/// Determine if the [`StatusCode`] signals a request-weight violation (429) or the resulting
/// IP ban (418).
pub fn is_rate_limit_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::IM_A_TEAPOT
}

/// Binance REST API error payload.
///
/// ### Raw Payload Examples
/// See docs: <https://developers.binance.com/docs/binance-spot-api-docs/errors>
/// ```json
/// {"code": -1121, "msg": "Invalid symbol."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BinanceApiError {
    pub code: i64,
    pub msg: String,
}
