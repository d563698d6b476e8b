use crate::{
    chart::ChartRenderer,
    clock::Sleeper,
    config::{ScannerConfig, SymbolSource},
    error::{ScanFailure, Stage},
    observer::ScanObserver,
};
use alttrend_data::{CandleWindow, MarketDataProvider, Symbol, Timeframe};
use alttrend_notify::{Alert, ChartArtifact, Notifier};
use alttrend_ta::{compression::CompressionDetector, indicators::IndicatorSet};
use futures::StreamExt;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// [`Scanner`] state. There is no terminal state: the scanner alternates forever.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum ScannerState {
    /// Next [`Scanner::step`] runs a full scan cycle.
    Scanning,
    /// Next [`Scanner::step`] sleeps the configured interval.
    Idle,
}

/// Summary of a completed scan cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct CycleSummary {
    /// Sequence number of the cycle, starting at 1.
    pub cycle: u64,
    /// Number of (symbol, timeframe) pairs scanned.
    pub pairs: usize,
    /// Number of positive compression verdicts.
    pub alerts: usize,
    /// Number of failures reported to the [`ScanObserver`].
    pub failures: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Copy, Clone, Default)]
struct PairOutcome {
    alert: bool,
    failures: usize,
}

/// Drives the symbol × timeframe cross product through retrieval, indicator computation,
/// compression detection and alert delivery, sleeping between cycles.
///
/// Every failure is isolated to the smallest scope it occurs in and reported to the
/// [`ScanObserver`]; nothing escapes a cycle.
#[derive(Debug)]
pub struct Scanner<Market, Notify, Chart, Clock, Observer> {
    config: ScannerConfig,
    detector: CompressionDetector,
    market: Market,
    notifier: Notify,
    chart: Option<Chart>,
    sleeper: Clock,
    observer: Observer,
    state: ScannerState,
    cycle: u64,
}

impl<Market, Notify, Chart, Clock, Observer> Scanner<Market, Notify, Chart, Clock, Observer>
where
    Market: MarketDataProvider,
    Notify: Notifier,
    Chart: ChartRenderer,
    Clock: Sleeper,
    Observer: ScanObserver,
{
    /// Construct a new [`Scanner`] in the [`ScannerState::Scanning`] state.
    ///
    /// Chart rendering is skipped if `chart` is `None`.
    pub fn new(
        config: &ScannerConfig,
        market: Market,
        notifier: Notify,
        chart: Option<Chart>,
        sleeper: Clock,
        observer: Observer,
    ) -> Self {
        Self {
            config: config.clone(),
            detector: CompressionDetector::new(config.metric, config.threshold),
            market,
            notifier,
            chart,
            sleeper,
            observer,
            state: ScannerState::Scanning,
            cycle: 0,
        }
    }

    /// Run the scanner forever.
    pub async fn run(&mut self) {
        info!(
            timeframes = ?self.config.timeframes,
            ema_periods = ?self.config.ema_periods,
            metric = %self.config.metric,
            threshold = self.config.threshold,
            interval = ?self.config.interval,
            "Scanner running"
        );

        loop {
            self.step().await;
        }
    }

    /// Advance the state machine by one transition, returning the new [`ScannerState`].
    ///
    /// [`ScannerState::Scanning`] runs a whole cycle then becomes [`ScannerState::Idle`].
    /// [`ScannerState::Idle`] sleeps the configured interval then becomes
    /// [`ScannerState::Scanning`].
    pub async fn step(&mut self) -> ScannerState {
        self.state = match self.state {
            ScannerState::Scanning => {
                self.run_cycle().await;
                ScannerState::Idle
            }
            ScannerState::Idle => {
                debug!(interval = ?self.config.interval, "Scanner idle");
                self.sleeper.sleep(self.config.interval).await;
                ScannerState::Scanning
            }
        };
        self.state
    }

    /// Scan every (symbol, timeframe) pair once and report the [`CycleSummary`].
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let started = Instant::now();
        self.cycle += 1;

        let (symbols, discovery_failures) = self.symbols().await;

        let pairs = symbols
            .iter()
            .cartesian_product(self.config.timeframes.iter().copied())
            .collect::<Vec<_>>();

        let this = &*self;
        let outcomes = futures::stream::iter(
            pairs
                .iter()
                .map(|(symbol, timeframe)| this.process_pair(symbol, *timeframe)),
        )
        .buffered(this.config.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        let summary = CycleSummary {
            cycle: self.cycle,
            pairs: pairs.len(),
            alerts: outcomes.iter().filter(|outcome| outcome.alert).count(),
            failures: discovery_failures + outcomes.iter().map(|outcome| outcome.failures).sum::<usize>(),
            elapsed: started.elapsed(),
        };

        self.observer.on_cycle(&summary);
        summary
    }

    /// Resolve the symbols of this cycle, returning them with the number of failures reported.
    async fn symbols(&self) -> (Vec<Symbol>, usize) {
        match &self.config.symbols {
            SymbolSource::Fixed(symbols) => (symbols.clone(), 0),
            SymbolSource::Discover {
                quote_asset,
                status,
                max_symbols,
            } => match self.market.list_symbols(quote_asset, status).await {
                Ok(mut symbols) => {
                    symbols.truncate(*max_symbols);
                    debug!(%quote_asset, symbols = symbols.len(), "discovered symbols");
                    (symbols, 0)
                }
                Err(error) => {
                    self.observer
                        .on_failure(ScanFailure::cycle(Stage::Discovery, error));
                    (Vec::new(), 1)
                }
            },
        }
    }

    async fn process_pair(&self, symbol: &Symbol, timeframe: Timeframe) -> PairOutcome {
        let window = match self
            .market
            .get_candles(symbol, timeframe, self.config.candle_limit)
            .await
        {
            Ok(window) => window,
            Err(error) => {
                self.observer
                    .on_failure(ScanFailure::pair(Stage::Retrieval, symbol, timeframe, error));
                return PairOutcome {
                    alert: false,
                    failures: 1,
                };
            }
        };

        let indicators = match IndicatorSet::compute(&window.closes(), &self.config.ema_periods) {
            Ok(indicators) => indicators,
            Err(error) => {
                self.observer
                    .on_failure(ScanFailure::pair(Stage::Indicators, symbol, timeframe, error));
                return PairOutcome {
                    alert: false,
                    failures: 1,
                };
            }
        };

        let snapshot = indicators.latest();
        let verdict = self.detector.evaluate(&snapshot);

        debug!(
            %symbol,
            %timeframe,
            latest = ?snapshot.values(),
            %verdict,
            "evaluated pair"
        );

        if !verdict.compressed {
            return PairOutcome::default();
        }

        let mut failures = 0;
        let chart = match self.render(&window, &indicators, symbol, timeframe).await {
            Ok(chart) => chart,
            Err(failure) => {
                self.observer.on_failure(failure);
                failures += 1;
                None
            }
        };

        let alert = Alert::compression(symbol.clone(), timeframe, verdict).with_chart(chart);
        self.observer.on_alert(&alert);
        failures += self.dispatch(alert).await;

        PairOutcome {
            alert: true,
            failures,
        }
    }

    async fn render(
        &self,
        window: &CandleWindow,
        indicators: &IndicatorSet,
        symbol: &Symbol,
        timeframe: Timeframe,
    ) -> Result<Option<ChartArtifact>, ScanFailure> {
        let Some(chart) = &self.chart else {
            return Ok(None);
        };

        chart
            .render(window, indicators, symbol, timeframe)
            .await
            .map(Some)
            .map_err(|error| ScanFailure::pair(Stage::Chart, symbol, timeframe, error))
    }

    /// Deliver the [`Alert`] text, then its chart if present, returning the number of failed
    /// deliveries. The chart artifact is always removed afterwards.
    async fn dispatch(&self, alert: Alert) -> usize {
        let Alert {
            symbol,
            timeframe,
            message,
            chart,
        } = alert;
        let mut failures = 0;

        if let Err(error) = self.notifier.send_text(&message).await {
            self.observer
                .on_failure(ScanFailure::pair(Stage::TextDelivery, &symbol, timeframe, error));
            failures += 1;
        }

        if let Some(artifact) = chart {
            let caption = format!("{symbol} ({timeframe})");
            if let Err(error) = self.notifier.send_image(&artifact, &caption).await {
                self.observer.on_failure(ScanFailure::pair(
                    Stage::ImageDelivery,
                    &symbol,
                    timeframe,
                    error,
                ));
                failures += 1;
            }
            artifact.discard().await;
        }

        failures
    }
}

impl<Market, Notify, Chart, Clock, Observer> Scanner<Market, Notify, Chart, Clock, Observer> {
    pub fn state(&self) -> ScannerState {
        self.state
    }

    /// Number of cycles started so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn notifier(&self) -> &Notify {
        &self.notifier
    }

    pub fn sleeper(&self) -> &Clock {
        &self.sleeper
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
