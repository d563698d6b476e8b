use crate::symbol::Symbol;
use alttrend_integration::protocol::http::rest::RestRequest;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Request weight of an unfiltered `exchangeInfo` query.
pub const EXCHANGE_INFO_WEIGHT: usize = 20;

/// Fetch the trading rules & symbol metadata of every Binance spot pair.
///
/// See docs: <https://developers.binance.com/docs/binance-spot-api-docs/rest-api/general-endpoints#exchange-information>
#[derive(Debug, Copy, Clone, Default)]
pub struct GetExchangeInfo;

impl RestRequest for GetExchangeInfo {
    type Response = ExchangeInfo;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/exchangeInfo".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn weight(&self) -> usize {
        EXCHANGE_INFO_WEIGHT
    }
}

/// Subset of the Binance `exchangeInfo` response required for symbol discovery.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SymbolInfo {
    pub symbol: Symbol,
    pub status: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
}
