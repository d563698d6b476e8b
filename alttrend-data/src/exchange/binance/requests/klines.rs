use crate::{candle::Candle, symbol::Symbol, timeframe::Timeframe};
use alttrend_integration::{
    de::{StrEncoded, datetime_utc_from_epoch_duration, extract_next},
    protocol::http::rest::RestRequest,
};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Maximum number of klines Binance returns for a single request.
pub const MAX_KLINES_LIMIT: usize = 1000;

/// Request weight of a `klines` query.
pub const KLINES_WEIGHT: usize = 2;

/// Fetch the most recent `limit` klines of a [`Symbol`] at the provided [`Timeframe`].
///
/// See docs: <https://developers.binance.com/docs/binance-spot-api-docs/rest-api/market-data-endpoints#klinecandlestick-data>
#[derive(Debug, Clone)]
pub struct GetKlines(KlinesParams);

impl GetKlines {
    pub fn new(symbol: Symbol, interval: Timeframe, limit: usize) -> Self {
        Self(KlinesParams {
            symbol,
            interval,
            limit,
        })
    }
}

impl RestRequest for GetKlines {
    type Response = Vec<BinanceKline>;
    type QueryParams = KlinesParams;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/klines".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.0)
    }

    fn weight(&self) -> usize {
        KLINES_WEIGHT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KlinesParams {
    pub symbol: Symbol,
    pub interval: Timeframe,
    pub limit: usize,
}

/// Binance kline, encoded as a positional Json array.
///
/// ### Raw Payload Examples
/// ```json
/// [
///   1499040000000,      // Kline open time
///   "0.01634790",       // Open price
///   "0.80000000",       // High price
///   "0.01575800",       // Low price
///   "0.01577100",       // Close price
///   "148976.11427815",  // Volume
///   1499644799999,      // Kline close time
///   "2434.19055334",    // Quote asset volume
///   308,                // Number of trades
///   "1756.87402397",    // Taker buy base asset volume
///   "28.46694368",      // Taker buy quote asset volume
///   "0"                 // Unused field, ignore.
/// ]
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BinanceKline {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl<'de> Deserialize<'de> for BinanceKline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        struct SeqVisitor;

        impl<'de> serde::de::Visitor<'de> for SeqVisitor {
            type Value = BinanceKline;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("BinanceKline struct from the Binance REST API")
            }

            fn visit_seq<SeqAccessor>(
                self,
                mut seq: SeqAccessor,
            ) -> Result<Self::Value, SeqAccessor::Error>
            where
                SeqAccessor: serde::de::SeqAccess<'de>,
            {
                let open_time_ms: u64 = extract_next(&mut seq, "open_time")?;
                let StrEncoded(open) = extract_next(&mut seq, "open")?;
                let StrEncoded(high) = extract_next(&mut seq, "high")?;
                let StrEncoded(low) = extract_next(&mut seq, "low")?;
                let StrEncoded(close) = extract_next(&mut seq, "close")?;
                let StrEncoded(volume) = extract_next(&mut seq, "volume")?;

                // Ignore trailing close time, quote volume, trade count & taker volumes
                while seq.next_element::<serde::de::IgnoredAny>()?.is_some() {}

                Ok(BinanceKline {
                    open_time: datetime_utc_from_epoch_duration(
                        std::time::Duration::from_millis(open_time_ms),
                    ),
                    open,
                    high,
                    low,
                    close,
                    volume,
                })
            }
        }

        deserializer.deserialize_seq(SeqVisitor)
    }
}

impl From<BinanceKline> for Candle {
    fn from(kline: BinanceKline) -> Self {
        Self {
            open_time: kline.open_time,
            open: kline.open,
            high: kline.high,
            low: kline.low,
            close: kline.close,
            volume: kline.volume,
        }
    }
}
