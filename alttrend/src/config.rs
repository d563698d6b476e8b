use alttrend_data::{
    Symbol, Timeframe,
    exchange::binance::{BinanceConfig, requests::klines::MAX_KLINES_LIMIT},
};
use alttrend_notify::telegram::TelegramConfig;
use alttrend_ta::compression::CompressionMetric;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::warn;

/// Default discovery quote asset.
pub const DEFAULT_QUOTE_ASSET: &str = "USDT";

/// Default discovery symbol status.
pub const DEFAULT_SYMBOL_STATUS: &str = "TRADING";

/// Default number of discovered symbols kept per cycle.
pub const DEFAULT_MAX_SYMBOLS: usize = 20;

/// Default EMA periods.
pub const DEFAULT_EMA_PERIODS: [usize; 4] = [20, 50, 100, 200];

/// Default number of candles per window, enough to seed the longest default EMA.
pub const DEFAULT_CANDLE_LIMIT: usize = 250;

/// Default idle time between cycles.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);

/// Default liveness listener port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default timeframes scanned every cycle.
pub const DEFAULT_TIMEFRAMES: [Timeframe; 9] = [
    Timeframe::M1,
    Timeframe::M3,
    Timeframe::M5,
    Timeframe::M15,
    Timeframe::M30,
    Timeframe::H1,
    Timeframe::H2,
    Timeframe::H4,
    Timeframe::D1,
];

/// Startup configuration errors. These are the only fatal errors of the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{present} is set but {missing} is not: provide both or neither")]
    PartialTelegram {
        present: &'static str,
        missing: &'static str,
    },
}

impl ConfigError {
    fn invalid<Reason>(var: &'static str, value: &str, reason: Reason) -> Self
    where
        Reason: Display,
    {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Source of the symbols scanned each cycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum SymbolSource {
    /// Discover symbols from the exchange every cycle, keeping the first `max_symbols`.
    Discover {
        quote_asset: String,
        status: String,
        max_symbols: usize,
    },

    /// Scan a fixed list of symbols, bypassing discovery.
    Fixed(Vec<Symbol>),
}

impl Default for SymbolSource {
    fn default() -> Self {
        Self::Discover {
            quote_asset: DEFAULT_QUOTE_ASSET.to_string(),
            status: DEFAULT_SYMBOL_STATUS.to_string(),
            max_symbols: DEFAULT_MAX_SYMBOLS,
        }
    }
}

/// [`Scanner`](crate::scanner::Scanner) configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScannerConfig {
    pub symbols: SymbolSource,
    pub timeframes: Vec<Timeframe>,
    pub ema_periods: Vec<usize>,
    pub metric: CompressionMetric,
    pub threshold: f64,
    pub candle_limit: usize,
    pub interval: Duration,
    pub concurrency: usize,
    pub chart_enabled: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        let metric = CompressionMetric::default();
        Self {
            symbols: SymbolSource::default(),
            timeframes: DEFAULT_TIMEFRAMES.to_vec(),
            ema_periods: DEFAULT_EMA_PERIODS.to_vec(),
            metric,
            threshold: metric.reference_threshold(),
            candle_limit: DEFAULT_CANDLE_LIMIT,
            interval: DEFAULT_SCAN_INTERVAL,
            concurrency: 1,
            chart_enabled: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format {other}, expected text or json")),
        }
    }
}

/// Complete application configuration, built once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    pub scanner: ScannerConfig,
    pub binance: BinanceConfig,
    /// Telegram delivery, `None` if disabled (alerts are only logged).
    pub telegram: Option<TelegramConfig>,
    pub port: u16,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load the [`AppConfig`] from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load the [`AppConfig`] using the provided variable lookup.
    ///
    /// Values are trimmed, and empty values are treated as unset.
    pub fn from_lookup<Lookup>(lookup: Lookup) -> Result<Self, ConfigError>
    where
        Lookup: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let telegram = match (var("BOT_TOKEN"), var("CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::PartialTelegram {
                    present: "BOT_TOKEN",
                    missing: "CHAT_ID",
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::PartialTelegram {
                    present: "CHAT_ID",
                    missing: "BOT_TOKEN",
                });
            }
        };

        let symbols = match var("SCAN_SYMBOLS") {
            Some(value) => {
                let symbols = parse_list::<String>("SCAN_SYMBOLS", &value)?;
                SymbolSource::Fixed(symbols.into_iter().map(Symbol::from).collect())
            }
            None => SymbolSource::Discover {
                quote_asset: var("SCAN_QUOTE_ASSET")
                    .map(|asset| asset.to_ascii_uppercase())
                    .unwrap_or_else(|| DEFAULT_QUOTE_ASSET.to_string()),
                status: DEFAULT_SYMBOL_STATUS.to_string(),
                max_symbols: parse_or("SCAN_MAX_SYMBOLS", var("SCAN_MAX_SYMBOLS"), DEFAULT_MAX_SYMBOLS)?,
            },
        };

        let timeframes = match var("SCAN_TIMEFRAMES") {
            Some(value) => parse_list("SCAN_TIMEFRAMES", &value)?,
            None => DEFAULT_TIMEFRAMES.to_vec(),
        };

        let ema_periods = match var("EMA_PERIODS") {
            Some(value) => parse_list("EMA_PERIODS", &value)?,
            None => DEFAULT_EMA_PERIODS.to_vec(),
        };

        let metric = parse_or::<CompressionMetric>(
            "COMPRESSION_METRIC",
            var("COMPRESSION_METRIC"),
            CompressionMetric::default(),
        )?;

        let scanner = ScannerConfig {
            symbols,
            timeframes,
            ema_periods,
            metric,
            threshold: parse_or(
                "COMPRESSION_THRESHOLD",
                var("COMPRESSION_THRESHOLD"),
                metric.reference_threshold(),
            )?,
            candle_limit: parse_or("CANDLE_LIMIT", var("CANDLE_LIMIT"), DEFAULT_CANDLE_LIMIT)?,
            interval: Duration::from_secs(parse_or(
                "SCAN_INTERVAL_SECS",
                var("SCAN_INTERVAL_SECS"),
                DEFAULT_SCAN_INTERVAL.as_secs(),
            )?),
            concurrency: parse_or("SCAN_CONCURRENCY", var("SCAN_CONCURRENCY"), 1)?,
            chart_enabled: match var("CHART_ENABLED") {
                Some(value) => parse_bool("CHART_ENABLED", &value)?,
                None => false,
            },
        };

        let config = Self {
            scanner,
            binance: BinanceConfig::default(),
            telegram,
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT)?,
            log_format: parse_or("LOG_FORMAT", var("LOG_FORMAT"), LogFormat::default())?,
        };

        config.scanner.validate()?;
        Ok(config)
    }
}

impl ScannerConfig {
    /// Validate the configuration, warning about settings that can never produce an alert.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let SymbolSource::Fixed(symbols) = &self.symbols
            && symbols.is_empty()
        {
            return Err(ConfigError::invalid("SCAN_SYMBOLS", "", "no symbols provided"));
        }

        if self.timeframes.is_empty() {
            return Err(ConfigError::invalid("SCAN_TIMEFRAMES", "", "no timeframes provided"));
        }

        if self.ema_periods.is_empty() || self.ema_periods.contains(&0) {
            return Err(ConfigError::invalid(
                "EMA_PERIODS",
                &format!("{:?}", self.ema_periods),
                "periods must be non-empty and greater than zero",
            ));
        }

        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ConfigError::invalid(
                "COMPRESSION_THRESHOLD",
                &self.threshold.to_string(),
                "threshold must be a positive number",
            ));
        }

        if !(1..=MAX_KLINES_LIMIT).contains(&self.candle_limit) {
            return Err(ConfigError::invalid(
                "CANDLE_LIMIT",
                &self.candle_limit.to_string(),
                format!("limit must be within 1..={MAX_KLINES_LIMIT}"),
            ));
        }

        if self.concurrency == 0 {
            return Err(ConfigError::invalid("SCAN_CONCURRENCY", "0", "must be at least 1"));
        }

        if let Some(longest) = self.ema_periods.iter().max()
            && self.candle_limit < *longest
        {
            warn!(
                candle_limit = self.candle_limit,
                longest_period = longest,
                "candle limit is shorter than the longest EMA period, no alert can ever be raised"
            );
        }

        Ok(())
    }
}

fn parse_or<T>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(value) => value
            .parse()
            .map_err(|error| ConfigError::invalid(var, &value, error)),
        None => Ok(default),
    }
}

fn parse_list<T>(var: &'static str, value: &str) -> Result<Vec<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse()
                .map_err(|error| ConfigError::invalid(var, value, error))
        })
        .collect()
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(var, value, "expected a boolean")),
    }
}
