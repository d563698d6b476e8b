use crate::indicators::LatestIndicatorSnapshot;
use derive_more::Display;
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Distance metric used to measure how tightly the latest EMA values are clustered.
///
/// Smaller distances mean tighter clustering. Both metrics are absolute price distances and are
/// not normalised by the asset price, so one threshold behaves very differently for a 0.0001 USDT
/// asset and a 60_000 USDT asset.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Default,
    Deserialize,
    Serialize,
    Display,
)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMetric {
    /// `max(values) - min(values)`.
    #[default]
    #[display("range")]
    Range,

    /// Sum of absolute differences between consecutive values in ascending period order,
    /// eg/ `|ema20 - ema50| + |ema50 - ema100| + |ema100 - ema200|`.
    #[display("chained_difference")]
    ChainedDifference,
}

impl CompressionMetric {
    /// Reference threshold for the [`CompressionMetric::Range`] metric.
    pub const RANGE_THRESHOLD: f64 = 0.2;

    /// Reference threshold for the [`CompressionMetric::ChainedDifference`] metric.
    pub const CHAINED_DIFFERENCE_THRESHOLD: f64 = 0.5;

    /// Reference threshold used when none is configured.
    pub fn reference_threshold(&self) -> f64 {
        match self {
            Self::Range => Self::RANGE_THRESHOLD,
            Self::ChainedDifference => Self::CHAINED_DIFFERENCE_THRESHOLD,
        }
    }

    /// Measure the distance of the provided values, or `None` if there are no values.
    pub fn distance(&self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Range => match values.iter().copied().minmax_by(f64::total_cmp) {
                MinMaxResult::NoElements => None,
                MinMaxResult::OneElement(_) => Some(0.0),
                MinMaxResult::MinMax(min, max) => Some(max - min),
            },
            Self::ChainedDifference if values.is_empty() => None,
            Self::ChainedDifference => Some(
                values
                    .iter()
                    .tuple_windows()
                    .map(|(a, b)| (a - b).abs())
                    .sum(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown compression metric: {0} (expected range or chained)")]
pub struct ParseCompressionMetricError(pub String);

impl FromStr for CompressionMetric {
    type Err = ParseCompressionMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "range" => Ok(Self::Range),
            "chained" | "chained_difference" | "chained-difference" => {
                Ok(Self::ChainedDifference)
            }
            other => Err(ParseCompressionMetricError(other.to_string())),
        }
    }
}

/// Outcome of evaluating a [`LatestIndicatorSnapshot`].
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompressionVerdict {
    /// True if the averages are compressed, ie/ `distance < threshold`.
    pub compressed: bool,

    /// Metric used to measure the distance.
    pub metric: CompressionMetric,

    /// Measured distance, `None` if any input value was undefined.
    pub distance: Option<f64>,

    /// Threshold the distance was compared against.
    pub threshold: f64,
}

impl std::fmt::Display for CompressionVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.distance {
            Some(distance) => {
                let comparison = if self.compressed { "<" } else { ">=" };
                write!(
                    f,
                    "{} {distance:.6} {comparison} {}",
                    self.metric, self.threshold
                )
            }
            None => write!(f, "{} undefined", self.metric),
        }
    }
}

/// Stateless compression predicate over the latest EMA values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CompressionDetector {
    metric: CompressionMetric,
    threshold: f64,
}

impl CompressionDetector {
    pub fn new(metric: CompressionMetric, threshold: f64) -> Self {
        Self { metric, threshold }
    }

    /// Construct a detector using the [`CompressionMetric::reference_threshold`].
    pub fn with_reference_threshold(metric: CompressionMetric) -> Self {
        Self::new(metric, metric.reference_threshold())
    }

    pub fn metric(&self) -> CompressionMetric {
        self.metric
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluate the snapshot.
    ///
    /// Any undefined or non-finite value short-circuits to a negative verdict without a distance.
    pub fn evaluate(&self, snapshot: &LatestIndicatorSnapshot) -> CompressionVerdict {
        let distance = snapshot
            .defined()
            .and_then(|values| self.metric.distance(&values));

        CompressionVerdict {
            compressed: distance.is_some_and(|distance| distance < self.threshold),
            metric: self.metric,
            distance,
            threshold: self.threshold,
        }
    }
}
