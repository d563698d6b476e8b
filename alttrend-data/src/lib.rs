#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::pedantic, clippy::type_complexity)]
#![warn(
    missing_debug_implementations,
    missing_copy_implementations,
    rust_2018_idioms
)]

//! # AltTrend-Data
//! Market data retrieval for the AltTrend scanner:
//! * **Discovery**: list the tradable [`Symbol`]s quoted in an asset via
//!   [`MarketDataProvider::list_symbols`].
//! * **Candles**: fetch the most recent [`CandleWindow`] of OHLCV candles for a
//!   ([`Symbol`], [`Timeframe`]) pair via [`MarketDataProvider::get_candles`].
//!
//! The only integration is Binance spot ([`BinanceMarketData`](exchange::binance::BinanceMarketData)),
//! executed over the [`RestClient`](alttrend_integration::protocol::http::rest::client::RestClient)
//! with a request-weight [`RateLimiter`](alttrend_integration::rate_limit::RateLimiter).

use async_trait::async_trait;

pub use crate::{
    candle::{Candle, CandleWindow},
    error::RetrievalError,
    symbol::Symbol,
    timeframe::Timeframe,
};

/// All [`Error`](std::error::Error)s generated in AltTrend-Data.
pub mod error;

/// Normalised OHLCV [`Candle`] & ordered [`CandleWindow`] models.
pub mod candle;

/// [`Symbol`] identifier of a tradable pair.
pub mod symbol;

/// Supported candle resolutions.
pub mod timeframe;

/// Exchange integrations implementing [`MarketDataProvider`].
pub mod exchange;

/// Remote source of symbols & candles.
///
/// Every call is a single outbound request with no retries: callers treat an `Err` as
/// "skip this item".
#[async_trait]
pub trait MarketDataProvider {
    /// List every symbol quoted in `quote_asset` with the provided `status`, in provider order.
    async fn list_symbols(
        &self,
        quote_asset: &str,
        status: &str,
    ) -> Result<Vec<Symbol>, RetrievalError>;

    /// Fetch the most recent `limit` candles for the pair.
    ///
    /// Empty or undersized responses are an `Err`.
    async fn get_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleWindow, RetrievalError>;
}
