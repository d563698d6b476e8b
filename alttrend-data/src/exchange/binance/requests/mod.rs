/// `GET /api/v3/exchangeInfo` symbol discovery request.
pub mod exchange_info;

/// `GET /api/v3/klines` candle request.
pub mod klines;
