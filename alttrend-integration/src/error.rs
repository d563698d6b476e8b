use thiserror::Error;

/// All socket IO related errors generated in `alttrend-integration`.
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("Deserialising JSON error: {error} for payload: {body}", body = String::from_utf8_lossy(.payload))]
    DeserialiseBinary {
        error: serde_json::Error,
        payload: Vec<u8>,
    },

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("HTTP request timed out")]
    HttpTimeout(reqwest::Error),

    /// REST http response error
    #[error("HTTP response (status={0}) error: {1}")]
    HttpResponse(reqwest::StatusCode, String),
}

impl SocketError {
    /// Determine if the error was caused by the request exceeding its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SocketError::HttpTimeout(_))
    }
}

/// Urls are stripped from every [`reqwest::Error`] since some APIs (eg/ Telegram) embed
/// credentials in the request path.
impl From<reqwest::Error> for SocketError {
    fn from(error: reqwest::Error) -> Self {
        match error.without_url() {
            error if error.is_timeout() => SocketError::HttpTimeout(error),
            error => SocketError::Http(error),
        }
    }
}
