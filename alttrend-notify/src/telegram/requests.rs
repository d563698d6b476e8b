use super::parser::TelegramResponse;
use alttrend_integration::{error::SocketError, protocol::http::rest::RestRequest};
use derive_more::Constructor;
use reqwest::{
    Method,
    multipart::{Form, Part},
};
use serde::{Serialize, de::IgnoredAny};
use std::{borrow::Cow, sync::Arc};

/// Send a plain text message to a chat.
///
/// See docs: <https://core.telegram.org/bots/api#sendmessage>
#[derive(Debug, Clone)]
pub struct SendMessage {
    token: Arc<str>,
    body: SendMessageBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessageBody {
    pub chat_id: String,
    pub text: String,
}

impl SendMessage {
    pub fn new(token: Arc<str>, chat_id: String, text: String) -> Self {
        Self {
            token,
            body: SendMessageBody { chat_id, text },
        }
    }
}

impl RestRequest for SendMessage {
    type Response = TelegramResponse<IgnoredAny>;
    type QueryParams = ();
    type Body = SendMessageBody;

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/bot{}/sendMessage", self.token))
    }

    fn method() -> Method {
        Method::POST
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(&self.body)
    }
}

/// Upload a file with a caption to a chat.
///
/// Used for SVG charts, which `sendPhoto` does not accept.
///
/// See docs: <https://core.telegram.org/bots/api#senddocument>
#[derive(Clone, Constructor)]
pub struct SendDocument {
    token: Arc<str>,
    chat_id: String,
    caption: String,
    file_name: String,
    document: Vec<u8>,
}

impl std::fmt::Debug for SendDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendDocument")
            .field("chat_id", &self.chat_id)
            .field("caption", &self.caption)
            .field("file_name", &self.file_name)
            .field("document_len", &self.document.len())
            .finish()
    }
}

impl RestRequest for SendDocument {
    type Response = TelegramResponse<IgnoredAny>;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/bot{}/sendDocument", self.token))
    }

    fn method() -> Method {
        Method::POST
    }

    fn multipart(&self) -> Result<Option<Form>, SocketError> {
        let document = Part::bytes(self.document.clone())
            .file_name(self.file_name.clone())
            .mime_str("image/svg+xml")?;

        Ok(Some(
            Form::new()
                .text("chat_id", self.chat_id.clone())
                .text("caption", self.caption.clone())
                .part("document", document),
        ))
    }
}
