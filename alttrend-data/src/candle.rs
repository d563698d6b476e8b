use crate::error::RetrievalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalised OHLCV [`Candle`] model.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Most recent candles of one (symbol, timeframe) pair, in strictly increasing `open_time` order.
///
/// Gaps between candles are not validated.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct CandleWindow {
    candles: Vec<Candle>,
}

impl CandleWindow {
    /// Construct a non-empty [`CandleWindow`], validating the candle order.
    pub fn new(candles: Vec<Candle>) -> Result<Self, RetrievalError> {
        if candles.is_empty() {
            return Err(RetrievalError::Empty);
        }

        if let Some(pair) = candles
            .windows(2)
            .find(|pair| pair[1].open_time <= pair[0].open_time)
        {
            return Err(RetrievalError::OutOfOrder {
                previous: pair[0].open_time,
                current: pair[1].open_time,
            });
        }

        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Final (most recent) candle of the window.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Close prices, aligned index-for-index with [`Self::candles`].
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|candle| candle.close).collect()
    }
}
