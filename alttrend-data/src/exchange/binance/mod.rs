use self::{
    parser::BinanceParser,
    rate_limit::BinanceRateLimit,
    requests::{
        exchange_info::GetExchangeInfo,
        klines::{GetKlines, MAX_KLINES_LIMIT},
    },
};
use crate::{
    MarketDataProvider, candle::CandleWindow, error::RetrievalError, symbol::Symbol,
    timeframe::Timeframe,
};
use alttrend_integration::protocol::http::{
    public::PublicNoHeaders,
    rest::{RestRequest, client::RestClient},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// [`HttpParser`](alttrend_integration::protocol::http::HttpParser) for Binance REST responses.
pub mod parser;

/// Request-weight budget shared by every Binance REST request.
pub mod rate_limit;

/// Binance REST [`RestRequest`]s.
pub mod requests;

/// [`BinanceMarketData`] base url.
///
/// See docs: <https://developers.binance.com/docs/binance-spot-api-docs/rest-api/general-api-information>
pub const BASE_URL_BINANCE_SPOT: &str = "https://api.binance.com";

/// Default request weight allowance per minute of the Binance spot API.
pub const DEFAULT_WEIGHT_PER_MINUTE: usize = 6000;

/// Configuration of a [`BinanceMarketData`] client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BinanceConfig {
    pub base_url: String,
    pub weight_per_minute: usize,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL_BINANCE_SPOT.to_string(),
            weight_per_minute: DEFAULT_WEIGHT_PER_MINUTE,
        }
    }
}

/// Binance spot [`MarketDataProvider`].
///
/// Every call is a single weighted REST request. A rate limit response backs the
/// [`BinanceRateLimit`] off, and the next successful response resets it.
#[derive(Debug)]
pub struct BinanceMarketData {
    client: RestClient<'static, PublicNoHeaders, BinanceParser>,
    rate_limit: BinanceRateLimit,
}

impl BinanceMarketData {
    pub fn new(config: &BinanceConfig) -> Self {
        Self {
            client: RestClient::new(config.base_url.clone(), PublicNoHeaders, BinanceParser),
            rate_limit: BinanceRateLimit::new(config.weight_per_minute),
        }
    }

    async fn execute<Request>(&self, request: Request) -> Result<Request::Response, RetrievalError>
    where
        Request: RestRequest,
    {
        self.rate_limit.acquire(request.weight()).await;

        match self.client.execute(request).await {
            Ok((response, metric)) => {
                debug!(?metric, "Binance request succeeded");
                self.rate_limit.reset_backoff().await;
                Ok(response)
            }
            Err(error) => {
                if error.is_rate_limit() {
                    self.rate_limit.report_violation().await;
                }
                Err(error)
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for BinanceMarketData {
    async fn list_symbols(
        &self,
        quote_asset: &str,
        status: &str,
    ) -> Result<Vec<Symbol>, RetrievalError> {
        let exchange_info = self.execute(GetExchangeInfo).await?;

        let symbols = exchange_info
            .symbols
            .into_iter()
            .filter(|info| {
                info.quote_asset.eq_ignore_ascii_case(quote_asset)
                    && info.status.eq_ignore_ascii_case(status)
            })
            .map(|info| info.symbol)
            .collect::<Vec<_>>();

        debug!(
            quote_asset,
            status,
            symbols = symbols.len(),
            "listed Binance symbols"
        );

        Ok(symbols)
    }

    async fn get_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleWindow, RetrievalError> {
        if limit == 0 || limit > MAX_KLINES_LIMIT {
            return Err(RetrievalError::InvalidLimit(limit));
        }

        let mut klines = self
            .execute(GetKlines::new(symbol.clone(), timeframe, limit))
            .await?;

        if klines.is_empty() {
            return Err(RetrievalError::Empty);
        }

        if klines.len() < limit {
            return Err(RetrievalError::Insufficient {
                expected: limit,
                received: klines.len(),
            });
        }

        // Keep only the most recent `limit` candles
        let surplus = klines.len() - limit;
        klines.drain(..surplus);

        CandleWindow::new(klines.into_iter().map(Into::into).collect())
    }
}
