use crate::{DeliveryError, Notifier, alert::ChartArtifact};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;

/// Delivery recorded by a [`VecNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Text(String),
    Image { path: PathBuf, caption: String },
}

/// [`Notifier`] that stores every delivery in a vector.
///
/// Text and image deliveries can be configured to fail, which is useful for exercising failure
/// isolation.
#[derive(Debug, Default)]
pub struct VecNotifier {
    pub deliveries: Mutex<Vec<Delivery>>,
    fail_text: bool,
    fail_image: bool,
}

impl VecNotifier {
    /// [`VecNotifier`] whose text deliveries always fail.
    pub fn failing_text() -> Self {
        Self {
            fail_text: true,
            ..Self::default()
        }
    }

    /// [`VecNotifier`] whose image deliveries always fail.
    pub fn failing_image() -> Self {
        Self {
            fail_image: true,
            ..Self::default()
        }
    }

    /// Snapshot of every successful delivery so far, in order.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }
}

fn injected() -> DeliveryError {
    DeliveryError::Api {
        code: 500,
        description: "injected failure".to_string(),
    }
}

#[async_trait]
impl Notifier for VecNotifier {
    async fn send_text(&self, message: &str) -> Result<(), DeliveryError> {
        if self.fail_text {
            return Err(injected());
        }
        self.deliveries.lock().push(Delivery::Text(message.to_string()));
        Ok(())
    }

    async fn send_image(
        &self,
        artifact: &ChartArtifact,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        if self.fail_image {
            return Err(injected());
        }
        self.deliveries.lock().push(Delivery::Image {
            path: artifact.path.clone(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}
