/// `Binance` spot market data integration.
pub mod binance;
