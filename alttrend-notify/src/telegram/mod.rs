use self::{
    parser::TelegramParser,
    requests::{SendDocument, SendMessage},
};
use crate::{DeliveryError, Notifier, alert::ChartArtifact};
use alttrend_integration::protocol::http::{
    public::PublicNoHeaders,
    rest::{RestRequest, client::RestClient},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::debug;

/// [`HttpParser`](alttrend_integration::protocol::http::HttpParser) for Telegram Bot API
/// responses.
pub mod parser;

/// Telegram Bot API [`RestRequest`]s.
pub mod requests;

/// [`TelegramNotifier`] base url.
///
/// See docs: <https://core.telegram.org/bots/api#making-requests>
pub const BASE_URL_TELEGRAM: &str = "https://api.telegram.org";

/// Telegram bot credentials & destination chat.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// [`Notifier`] delivering messages & chart documents to a Telegram chat.
#[derive(Debug)]
pub struct TelegramNotifier {
    client: RestClient<'static, PublicNoHeaders, TelegramParser>,
    token: Token,
    chat_id: String,
}

/// Bot token, kept out of `Debug` output.
#[derive(Clone)]
struct Token(Arc<str>);

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Self {
        Self::with_base_url(config, BASE_URL_TELEGRAM)
    }

    /// Construct a [`TelegramNotifier`] targeting an alternative Bot API server.
    pub fn with_base_url<Url>(config: &TelegramConfig, base_url: Url) -> Self
    where
        Url: Into<String>,
    {
        Self {
            client: RestClient::new(base_url.into(), PublicNoHeaders, TelegramParser),
            token: Token(Arc::from(config.bot_token.as_str())),
            chat_id: config.chat_id.clone(),
        }
    }

    async fn execute<Request>(&self, request: Request) -> Result<(), DeliveryError>
    where
        Request: RestRequest,
    {
        let (_, metric) = self.client.execute(request).await?;
        debug!(?metric, "Telegram request succeeded");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, message: &str) -> Result<(), DeliveryError> {
        self.execute(SendMessage::new(
            Arc::clone(&self.token.0),
            self.chat_id.clone(),
            message.to_string(),
        ))
        .await
    }

    async fn send_image(
        &self,
        artifact: &ChartArtifact,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        let document = tokio::fs::read(&artifact.path).await?;

        self.execute(SendDocument::new(
            Arc::clone(&self.token.0),
            self.chat_id.clone(),
            caption.to_string(),
            artifact.file_name(),
            document,
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_prints_token() {
        let config = TelegramConfig {
            bot_token: "123456:SECRET-TOKEN".to_string(),
            chat_id: "-1001".to_string(),
        };

        let config_debug = format!("{config:?}");
        let notifier_debug = format!("{:?}", TelegramNotifier::new(&config));

        for output in [config_debug, notifier_debug] {
            assert!(!output.contains("SECRET-TOKEN"), "leaked token: {output}");
        }
    }
}
