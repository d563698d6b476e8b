#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::pedantic, clippy::type_complexity)]
#![warn(
    missing_debug_implementations,
    missing_copy_implementations,
    rust_2018_idioms
)]

//! # AltTrend-Notify
//! Delivery of compression [`Alert`]s to an operator channel.
//!
//! The [`Notifier`] trait abstracts the channel. [`TelegramNotifier`](telegram::TelegramNotifier)
//! implements it over the Telegram Bot API, and `Option<N>` implements it for a disabled channel
//! that only logs. [`VecNotifier`] records deliveries for tests.

use async_trait::async_trait;
use tracing::info;

pub use crate::{
    alert::{Alert, ChartArtifact},
    error::DeliveryError,
    vec::{Delivery, VecNotifier},
};

/// [`Alert`] message & [`ChartArtifact`] models.
pub mod alert;

/// All [`Error`](std::error::Error)s generated in AltTrend-Notify.
pub mod error;

/// Telegram Bot API [`Notifier`].
pub mod telegram;

/// In-memory [`Notifier`] that records every delivery.
pub mod vec;

/// Outbound operator notification channel.
///
/// Implementations perform a single delivery attempt per call; callers own failure handling.
#[async_trait]
pub trait Notifier {
    /// Deliver a plain text message.
    async fn send_text(&self, message: &str) -> Result<(), DeliveryError>;

    /// Deliver a rendered chart with a caption.
    async fn send_image(&self, artifact: &ChartArtifact, caption: &str)
    -> Result<(), DeliveryError>;
}

#[async_trait]
impl<N> Notifier for Option<N>
where
    N: Notifier + Send + Sync,
{
    async fn send_text(&self, message: &str) -> Result<(), DeliveryError> {
        match self {
            Some(notifier) => notifier.send_text(message).await,
            None => {
                info!(%message, "Notifier disabled, alert logged only");
                Ok(())
            }
        }
    }

    async fn send_image(
        &self,
        artifact: &ChartArtifact,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        match self {
            Some(notifier) => notifier.send_image(artifact, caption).await,
            None => {
                info!(path = %artifact.path.display(), "Notifier disabled, chart discarded");
                Ok(())
            }
        }
    }
}
