#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! Technical analysis for AltTrend.
//!
//! This crate provides the exponential moving average indicators computed over a candle window,
//! and the stateless compression detector that decides if those averages have converged.

/// All [`Error`](std::error::Error)s generated in AltTrend-TA.
pub mod error;

/// Exponential moving average series and the per-period [`IndicatorSet`](indicators::IndicatorSet).
pub mod indicators;

/// [`CompressionDetector`](compression::CompressionDetector) predicate and its distance metrics.
pub mod compression;
