#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments)]

//! # AltTrend
//! Periodic scanner that detects **EMA compression** (the 20/50/100/200 exponential moving
//! averages converging) across a universe of Binance spot pairs and timeframes, and alerts an
//! operator over Telegram.
//!
//! ## Overview
//! Each cycle the [`Scanner`](scanner::Scanner) drives the cross product of symbols ×
//! timeframes through a one-way pipeline:
//! * **Data**: fetch a [`CandleWindow`](alttrend_data::CandleWindow) through a
//!   [`MarketDataProvider`](alttrend_data::MarketDataProvider).
//! * **Indicators**: compute an [`IndicatorSet`](alttrend_ta::indicators::IndicatorSet) of EMA
//!   series over the closes.
//! * **Detection**: evaluate the latest EMA values with a
//!   [`CompressionDetector`](alttrend_ta::compression::CompressionDetector).
//! * **Delivery**: on a positive verdict build an [`Alert`](alttrend_notify::Alert), optionally
//!   render a chart via a [`ChartRenderer`](chart::ChartRenderer), and deliver it through a
//!   [`Notifier`](alttrend_notify::Notifier).
//!
//! Every failure is caught at the pair boundary, wrapped in a [`ScanFailure`](error::ScanFailure)
//! and handed to a [`ScanObserver`](observer::ScanObserver), so one bad pair never stops a cycle.
//! Between cycles the scanner idles through an injectable [`Sleeper`](clock::Sleeper).

/// [`AppConfig`](config::AppConfig) loaded once at startup from environment variables.
pub mod config;

/// Default `tracing` subscriber initialisation.
pub mod logging;

/// [`ScanError`](error::ScanError) & [`ScanFailure`](error::ScanFailure) reported to the
/// [`ScanObserver`](observer::ScanObserver).
pub mod error;

/// Collaborators notified of scanner failures, alerts & cycle summaries.
pub mod observer;

/// Injectable [`Sleeper`](clock::Sleeper) used between scan cycles.
pub mod clock;

/// Optional SVG chart rendering of a candle window & its EMA series.
pub mod chart;

/// Scan / idle state machine driving the detection pipeline.
pub mod scanner;

/// Static liveness HTTP listener for hosting platforms.
pub mod liveness;
