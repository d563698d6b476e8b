use alttrend::{
    chart::{ChartError, ChartRenderer, SvgChartRenderer},
    clock::RecordingSleeper,
    config::{ScannerConfig, SymbolSource},
    error::{ErrorKind, Stage},
    observer::VecObserver,
    scanner::{Scanner, ScannerState},
};
use alttrend_data::{
    Candle, CandleWindow, MarketDataProvider, RetrievalError, Symbol, Timeframe,
};
use alttrend_notify::{ChartArtifact, Delivery, VecNotifier};
use alttrend_ta::{compression::CompressionMetric, indicators::IndicatorSet};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::time::Duration;

type CandleFn = fn(&Symbol, Timeframe, usize) -> Result<CandleWindow, RetrievalError>;

/// [`MarketDataProvider`] serving synthetic candles and recording every request.
struct StubMarket {
    listed: Option<Vec<Symbol>>,
    candles: CandleFn,
    calls: Mutex<Vec<(Symbol, Timeframe)>>,
}

impl StubMarket {
    fn new(candles: CandleFn) -> Self {
        Self {
            listed: None,
            candles,
            calls: Mutex::default(),
        }
    }

    fn listing(self, symbols: &[&str]) -> Self {
        Self {
            listed: Some(symbols.iter().copied().map(Symbol::new).collect()),
            ..self
        }
    }

    fn calls(&self) -> Vec<(Symbol, Timeframe)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MarketDataProvider for StubMarket {
    async fn list_symbols(
        &self,
        _: &str,
        _: &str,
    ) -> Result<Vec<Symbol>, RetrievalError> {
        self.listed.clone().ok_or(RetrievalError::Timeout)
    }

    async fn get_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleWindow, RetrievalError> {
        self.calls.lock().push((symbol.clone(), timeframe));
        (self.candles)(symbol, timeframe, limit)
    }
}

/// [`ChartRenderer`] that always fails.
struct BrokenChart;

#[async_trait]
impl ChartRenderer for BrokenChart {
    async fn render(
        &self,
        _: &CandleWindow,
        _: &IndicatorSet,
        _: &Symbol,
        _: Timeframe,
    ) -> Result<ChartArtifact, ChartError> {
        Err(ChartError::Io(std::io::Error::other("disk full")))
    }
}

fn window(closes: impl IntoIterator<Item = f64>) -> CandleWindow {
    let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    CandleWindow::new(
        closes
            .into_iter()
            .enumerate()
            .map(|(index, close)| Candle {
                open_time: start + TimeDelta::minutes(index as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
            })
            .collect(),
    )
    .unwrap()
}

fn flat(_: &Symbol, _: Timeframe, limit: usize) -> Result<CandleWindow, RetrievalError> {
    Ok(window(std::iter::repeat_n(100.0, limit)))
}

fn trending(_: &Symbol, _: Timeframe, limit: usize) -> Result<CandleWindow, RetrievalError> {
    Ok(window((0..limit).map(|index| 100.0 + index as f64)))
}

fn config(symbols: &[&str], timeframes: &[Timeframe]) -> ScannerConfig {
    ScannerConfig {
        symbols: SymbolSource::Fixed(symbols.iter().copied().map(Symbol::new).collect()),
        timeframes: timeframes.to_vec(),
        interval: Duration::from_secs(42),
        ..ScannerConfig::default()
    }
}

fn scanner<Chart>(
    config: &ScannerConfig,
    market: StubMarket,
    notifier: VecNotifier,
    chart: Option<Chart>,
) -> Scanner<StubMarket, VecNotifier, Chart, RecordingSleeper, VecObserver>
where
    Chart: ChartRenderer,
{
    Scanner::new(
        config,
        market,
        notifier,
        chart,
        RecordingSleeper::default(),
        VecObserver::default(),
    )
}

#[tokio::test]
async fn test_flat_closes_raise_one_text_alert() {
    let config = config(&["BTCUSDT"], &[Timeframe::H1]);
    let mut scanner = scanner::<SvgChartRenderer>(
        &config,
        StubMarket::new(flat),
        VecNotifier::default(),
        None,
    );

    assert_eq!(scanner.step().await, ScannerState::Idle);

    let deliveries = scanner.notifier().deliveries();
    assert_eq!(deliveries.len(), 1);
    let Delivery::Text(message) = &deliveries[0] else {
        panic!("expected a text delivery, got: {deliveries:?}");
    };
    assert!(message.contains("BTCUSDT"));
    assert!(message.contains("(1h)"));
    assert!(message.contains("range 0.000000 < 0.2"));

    let cycles = scanner.observer().cycles.lock().clone();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].cycle, 1);
    assert_eq!(cycles[0].pairs, 1);
    assert_eq!(cycles[0].alerts, 1);
    assert_eq!(cycles[0].failures, 0);
    assert_eq!(scanner.observer().alerts.lock().len(), 1);
}

#[tokio::test]
async fn test_spread_averages_raise_no_alert() {
    let config = ScannerConfig {
        metric: CompressionMetric::ChainedDifference,
        threshold: CompressionMetric::CHAINED_DIFFERENCE_THRESHOLD,
        ..config(&["ETHUSDT"], &[Timeframe::M15, Timeframe::H4])
    };
    let mut scanner = scanner::<SvgChartRenderer>(
        &config,
        StubMarket::new(trending),
        VecNotifier::default(),
        None,
    );

    let summary = scanner.run_cycle().await;

    assert_eq!(summary.pairs, 2);
    assert_eq!(summary.alerts, 0);
    assert_eq!(summary.failures, 0);
    assert!(scanner.notifier().deliveries().is_empty());
    assert!(scanner.observer().alerts.lock().is_empty());
}

#[tokio::test]
async fn test_window_shorter_than_longest_period_is_negative_not_error() {
    let config = ScannerConfig {
        candle_limit: 100,
        ..config(&["BTCUSDT"], &[Timeframe::D1])
    };
    let mut scanner = scanner::<SvgChartRenderer>(
        &config,
        StubMarket::new(flat),
        VecNotifier::default(),
        None,
    );

    let summary = scanner.run_cycle().await;

    assert_eq!(summary.alerts, 0);
    assert_eq!(summary.failures, 0);
    assert!(scanner.notifier().deliveries().is_empty());
}

#[tokio::test]
async fn test_retrieval_failure_is_isolated_then_scanner_sleeps() {
    fn timeout_on_first_pair(
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleWindow, RetrievalError> {
        if symbol.as_str() == "AAAUSDT" && timeframe == Timeframe::M1 {
            Err(RetrievalError::Timeout)
        } else {
            flat(symbol, timeframe, limit)
        }
    }

    let config = config(&["AAAUSDT", "BBBUSDT"], &[Timeframe::M1, Timeframe::M5]);
    let mut scanner = scanner::<SvgChartRenderer>(
        &config,
        StubMarket::new(timeout_on_first_pair),
        VecNotifier::default(),
        None,
    );

    assert_eq!(scanner.step().await, ScannerState::Idle);

    // Every pair is attempted exactly once, including the pairs sharing a symbol or timeframe
    let calls = scanner.market().calls();
    assert_eq!(
        calls,
        vec![
            (Symbol::new("AAAUSDT"), Timeframe::M1),
            (Symbol::new("AAAUSDT"), Timeframe::M5),
            (Symbol::new("BBBUSDT"), Timeframe::M1),
            (Symbol::new("BBBUSDT"), Timeframe::M5),
        ]
    );

    {
        let failures = scanner.observer().failures.lock();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].stage, Stage::Retrieval);
        assert_eq!(failures[0].symbol, Some(Symbol::new("AAAUSDT")));
        assert_eq!(failures[0].timeframe, Some(Timeframe::M1));
        assert_eq!(failures[0].error.kind(), ErrorKind::Retrieval);
    }
    assert_eq!(scanner.notifier().deliveries().len(), 3);

    assert_eq!(scanner.step().await, ScannerState::Scanning);
    assert_eq!(
        scanner.sleeper().sleeps.lock().clone(),
        vec![Duration::from_secs(42)]
    );

    assert_eq!(scanner.step().await, ScannerState::Idle);
    assert_eq!(scanner.cycle(), 2);
    assert_eq!(scanner.observer().cycles.lock().len(), 2);
}

#[tokio::test]
async fn test_discovery_truncates_to_max_symbols() {
    let config = ScannerConfig {
        symbols: SymbolSource::Discover {
            quote_asset: "USDT".to_string(),
            status: "TRADING".to_string(),
            max_symbols: 3,
        },
        concurrency: 4,
        ..config(&[], &[Timeframe::M1, Timeframe::H1])
    };
    let market = StubMarket::new(trending).listing(&[
        "BTCUSDT", "ETHUSDT", "SOLUSDT", "XRPUSDT", "DOGEUSDT",
    ]);
    let mut scanner = scanner::<SvgChartRenderer>(&config, market, VecNotifier::default(), None);

    let summary = scanner.run_cycle().await;

    assert_eq!(summary.pairs, 6);
    let calls = scanner.market().calls();
    assert_eq!(calls.len(), 6);
    assert!(
        calls
            .iter()
            .all(|(symbol, _)| ["BTCUSDT", "ETHUSDT", "SOLUSDT"].contains(&symbol.as_str()))
    );
}

#[tokio::test]
async fn test_discovery_failure_completes_empty_cycle() {
    let config = ScannerConfig {
        symbols: SymbolSource::default(),
        ..config(&[], &[Timeframe::M1])
    };
    let mut scanner = scanner::<SvgChartRenderer>(
        &config,
        StubMarket::new(flat),
        VecNotifier::default(),
        None,
    );

    let summary = scanner.run_cycle().await;

    assert_eq!(summary.pairs, 0);
    assert_eq!(summary.failures, 1);
    assert!(scanner.market().calls().is_empty());

    let failures = scanner.observer().failures.lock();
    assert_eq!(failures[0].stage, Stage::Discovery);
    assert_eq!(failures[0].symbol, None);
}

#[tokio::test]
async fn test_text_delivery_failure_does_not_stop_cycle() {
    let config = config(&["BTCUSDT", "ETHUSDT"], &[Timeframe::H1]);
    let mut scanner = scanner::<SvgChartRenderer>(
        &config,
        StubMarket::new(flat),
        VecNotifier::failing_text(),
        None,
    );

    let summary = scanner.run_cycle().await;

    assert_eq!(summary.alerts, 2);
    assert_eq!(summary.failures, 2);
    let failures = scanner.observer().failures.lock();
    assert!(failures.iter().all(|failure| failure.stage == Stage::TextDelivery
        && failure.error.kind() == ErrorKind::Delivery));
    assert_eq!(failures[1].symbol, Some(Symbol::new("ETHUSDT")));
}

#[tokio::test]
async fn test_chart_is_delivered_then_removed() {
    let directory = std::env::temp_dir().join(format!("alttrend-scanner-{}", std::process::id()));
    let config = config(&["BTCUSDT"], &[Timeframe::H1]);
    let mut scanner = scanner(
        &config,
        StubMarket::new(flat),
        VecNotifier::default(),
        Some(SvgChartRenderer::new(directory.clone())),
    );

    let summary = scanner.run_cycle().await;
    assert_eq!(summary.failures, 0);

    let deliveries = scanner.notifier().deliveries();
    assert_eq!(deliveries.len(), 2);
    assert!(matches!(deliveries[0], Delivery::Text(_)));
    match &deliveries[1] {
        Delivery::Image { path, caption } => {
            assert_eq!(caption, "BTCUSDT (1h)");
            assert!(path.starts_with(&directory));
            assert!(!path.exists());
        }
        other => panic!("expected an image delivery, got: {other:?}"),
    }

    let _ = std::fs::remove_dir(&directory);
}

#[tokio::test]
async fn test_chart_failure_degrades_to_text_only() {
    let config = config(&["BTCUSDT"], &[Timeframe::H1]);
    let mut scanner = scanner(
        &config,
        StubMarket::new(flat),
        VecNotifier::default(),
        Some(BrokenChart),
    );

    let summary = scanner.run_cycle().await;

    assert_eq!(summary.alerts, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(scanner.notifier().deliveries().len(), 1);

    let failures = scanner.observer().failures.lock();
    assert_eq!(failures[0].stage, Stage::Chart);
    assert!(failures[0].error.is_soft());
}

#[tokio::test]
async fn test_image_delivery_failure_still_removes_chart() {
    let directory = std::env::temp_dir().join(format!("alttrend-image-{}", std::process::id()));
    let config = config(&["BTCUSDT"], &[Timeframe::H1]);
    let mut scanner = scanner(
        &config,
        StubMarket::new(flat),
        VecNotifier::failing_image(),
        Some(SvgChartRenderer::new(directory.clone())),
    );

    let summary = scanner.run_cycle().await;

    assert_eq!(summary.failures, 1);
    assert_eq!(
        scanner.observer().failures.lock()[0].stage,
        Stage::ImageDelivery
    );
    let leftover = std::fs::read_dir(&directory)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftover, 0);

    let _ = std::fs::remove_dir(&directory);
}
