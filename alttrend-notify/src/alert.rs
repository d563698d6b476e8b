use alttrend_data::{Symbol, Timeframe};
use derive_more::Constructor;
use std::{fmt::Display, path::PathBuf};
use tracing::warn;

/// Operator notification produced by a positive compression verdict.
///
/// Constructed once per verdict, delivered immediately and never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    pub message: String,
    pub chart: Option<ChartArtifact>,
}

impl Alert {
    /// Construct a compression [`Alert`] with the standard message layout, where `detail`
    /// describes the verdict (eg/ "range 0.104210 < 0.2").
    pub fn compression<Detail>(symbol: Symbol, timeframe: Timeframe, detail: Detail) -> Self
    where
        Detail: Display,
    {
        let message =
            format!("📊 Signal: {symbol} ({timeframe})\nEMA Compression Detected\n{detail}");

        Self {
            symbol,
            timeframe,
            message,
            chart: None,
        }
    }

    pub fn with_chart(self, chart: Option<ChartArtifact>) -> Self {
        Self { chart, ..self }
    }
}

/// Transient rendered chart image on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct ChartArtifact {
    pub path: PathBuf,
}

impl ChartArtifact {
    /// File name used when uploading the artifact.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chart.svg".to_string())
    }

    /// Delete the artifact from disk. Failure is logged and otherwise ignored.
    pub async fn discard(self) {
        if let Err(error) = tokio::fs::remove_file(&self.path).await {
            warn!(path = %self.path.display(), ?error, "failed to remove chart artifact");
        }
    }
}
