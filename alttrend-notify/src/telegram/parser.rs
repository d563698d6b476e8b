use crate::error::DeliveryError;
use alttrend_integration::protocol::http::HttpParser;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Telegram Bot API [`HttpParser`].
#[derive(Debug, Copy, Clone, Default)]
pub struct TelegramParser;

impl HttpParser for TelegramParser {
    type ApiError = TelegramApiError;
    type OutputError = DeliveryError;

    fn parse_api_error(&self, status: StatusCode, error: Self::ApiError) -> Self::OutputError {
        if status == StatusCode::TOO_MANY_REQUESTS || error.error_code == 429 {
            DeliveryError::RateLimited {
                retry_after: error.parameters.and_then(|parameters| parameters.retry_after),
            }
        } else {
            DeliveryError::Api {
                code: error.error_code,
                description: error.description,
            }
        }
    }
}

/// Successful Telegram Bot API response envelope.
///
/// ### Raw Payload Examples
/// ```json
/// {"ok": true, "result": {"message_id": 7, "chat": {"id": -1001}, "text": "hi"}}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    pub result: T,
}

/// Telegram Bot API error payload.
///
/// ### Raw Payload Examples
/// See docs: <https://core.telegram.org/bots/api#making-requests>
/// ```json
/// {"ok": false, "error_code": 429, "description": "Too Many Requests: retry after 5", "parameters": {"retry_after": 5}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TelegramApiError {
    pub ok: bool,
    pub error_code: i64,
    pub description: String,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResponseParameters {
    #[serde(default)]
    pub retry_after: Option<u64>,
}
