use crate::chart::ChartError;
use alttrend_data::{RetrievalError, Symbol, Timeframe};
use alttrend_notify::DeliveryError;
use alttrend_ta::error::ComputationError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Any recoverable error encountered while scanning a pair.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("RetrievalError: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("ComputationError: {0}")]
    Computation(#[from] ComputationError),

    #[error("DeliveryError: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("ChartError: {0}")]
    Render(#[from] ChartError),
}

/// Category of a [`ScanError`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[display("retrieval")]
    Retrieval,
    #[display("computation")]
    Computation,
    #[display("delivery")]
    Delivery,
    #[display("render")]
    Render,
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::Retrieval(_) => ErrorKind::Retrieval,
            ScanError::Computation(_) => ErrorKind::Computation,
            ScanError::Delivery(_) => ErrorKind::Delivery,
            ScanError::Render(_) => ErrorKind::Render,
        }
    }

    /// Determine if the error only degrades an alert rather than dropping it.
    pub fn is_soft(&self) -> bool {
        matches!(self, ScanError::Render(_))
    }
}

/// Pipeline stage at which a [`ScanFailure`] occurred.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[display("discovery")]
    Discovery,
    #[display("retrieval")]
    Retrieval,
    #[display("indicators")]
    Indicators,
    #[display("chart")]
    Chart,
    #[display("text_delivery")]
    TextDelivery,
    #[display("image_delivery")]
    ImageDelivery,
}

/// A [`ScanError`] with the context it occurred in.
///
/// `symbol` & `timeframe` are absent for cycle-level failures such as symbol discovery.
#[derive(Debug)]
pub struct ScanFailure {
    pub stage: Stage,
    pub symbol: Option<Symbol>,
    pub timeframe: Option<Timeframe>,
    pub error: ScanError,
}

impl ScanFailure {
    /// Construct a [`ScanFailure`] scoped to a single (symbol, timeframe) pair.
    pub fn pair<E>(stage: Stage, symbol: &Symbol, timeframe: Timeframe, error: E) -> Self
    where
        E: Into<ScanError>,
    {
        Self {
            stage,
            symbol: Some(symbol.clone()),
            timeframe: Some(timeframe),
            error: error.into(),
        }
    }

    /// Construct a cycle-level [`ScanFailure`] not tied to any pair.
    pub fn cycle<E>(stage: Stage, error: E) -> Self
    where
        E: Into<ScanError>,
    {
        Self {
            stage,
            symbol: None,
            timeframe: None,
            error: error.into(),
        }
    }
}
