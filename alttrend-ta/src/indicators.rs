use crate::error::ComputationError;
use alttrend_integration::collection::FnvIndexMap;

/// Exponential moving average indicator.
///
/// Produces no value until `period` prices have been observed. The first value is the simple
/// average of those `period` prices, every subsequent value follows the recurrence
/// `ema = (price - prev) * k + prev` where `k = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    period: usize,
    multiplier: f64,
    seed_sum: f64,
    observed: usize,
    value: Option<f64>,
}

impl ExponentialMovingAverage {
    /// Create a new EMA with the given period.
    pub fn new(period: usize) -> Result<Self, ComputationError> {
        if period == 0 {
            return Err(ComputationError::ZeroPeriod);
        }

        Ok(Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            observed: 0,
            value: None,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Update the EMA with a new price and return the latest value, if seeded.
    pub fn update(&mut self, price: f64) -> Option<f64> {
        match self.value {
            Some(prev) => {
                self.value = Some((price - prev) * self.multiplier + prev);
            }
            None => {
                self.seed_sum += price;
                self.observed += 1;
                if self.observed == self.period {
                    self.value = Some(self.seed_sum / self.period as f64);
                }
            }
        }
        self.value
    }

    /// Current EMA value if seeded.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// Compute the EMA of every close, aligned index-for-index with the input.
///
/// The first `period - 1` entries are `None`.
pub fn ema_series(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, ComputationError> {
    let mut ema = ExponentialMovingAverage::new(period)?;
    Ok(closes.iter().map(|close| ema.update(*close)).collect())
}

/// EMA series for every configured period over one candle window, keyed by period in ascending
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    len: usize,
    series: FnvIndexMap<usize, Vec<Option<f64>>>,
}

impl IndicatorSet {
    /// Compute one EMA series per period over the provided closes.
    ///
    /// Periods are de-duplicated and sorted ascending.
    pub fn compute(closes: &[f64], periods: &[usize]) -> Result<Self, ComputationError> {
        if periods.is_empty() {
            return Err(ComputationError::NoPeriods);
        }

        let mut periods = periods.to_vec();
        periods.sort_unstable();
        periods.dedup();

        let series: FnvIndexMap<_, _> = periods
            .into_iter()
            .map(|period| ema_series(closes, period).map(|series| (period, series)))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            len: closes.len(),
            series,
        })
    }

    /// Number of values in every series, equal to the number of candles in the window.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configured periods in ascending order.
    pub fn periods(&self) -> impl Iterator<Item = usize> + '_ {
        self.series.keys().copied()
    }

    /// EMA series for the provided period.
    pub fn series(&self, period: usize) -> Option<&[Option<f64>]> {
        self.series.get(&period).map(Vec::as_slice)
    }

    /// Iterate over every `(period, series)` in ascending period order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Option<f64>])> + '_ {
        self.series
            .iter()
            .map(|(period, series)| (*period, series.as_slice()))
    }

    /// Indicator values at the final candle of the window.
    pub fn latest(&self) -> LatestIndicatorSnapshot {
        LatestIndicatorSnapshot {
            values: self
                .series
                .iter()
                .map(|(period, series)| (*period, series.last().copied().flatten()))
                .collect(),
        }
    }
}

/// EMA values at the final candle of a window, in ascending period order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LatestIndicatorSnapshot {
    values: Vec<(usize, Option<f64>)>,
}

impl LatestIndicatorSnapshot {
    /// Construct a snapshot from `(period, value)` pairs, sorting by period.
    pub fn new<Iter>(values: Iter) -> Self
    where
        Iter: IntoIterator<Item = (usize, Option<f64>)>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_unstable_by_key(|(period, _)| *period);
        Self { values }
    }

    pub fn values(&self) -> &[(usize, Option<f64>)] {
        &self.values
    }

    /// Every value if all of them are defined & finite, otherwise `None`.
    pub fn defined(&self) -> Option<Vec<f64>> {
        if self.values.is_empty() {
            return None;
        }

        self.values
            .iter()
            .map(|(_, value)| value.filter(|value| value.is_finite()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seeds_with_simple_average() {
        let mut ema = ExponentialMovingAverage::new(3).unwrap();
        assert_eq!(ema.update(1.0), None);
        assert_eq!(ema.update(2.0), None);
        assert_eq!(ema.update(3.0), Some(2.0));

        // k = 0.5 => (4 - 2) * 0.5 + 2
        assert_eq!(ema.update(4.0), Some(3.0));
        assert_eq!(ema.value(), Some(3.0));
    }

    #[test]
    fn test_ema_zero_period() {
        assert_eq!(
            ExponentialMovingAverage::new(0).unwrap_err(),
            ComputationError::ZeroPeriod
        );
    }

    #[test]
    fn test_ema_series() {
        struct TestCase {
            closes: Vec<f64>,
            period: usize,
            expected: Vec<Option<f64>>,
        }

        let tests = vec![
            TestCase {
                // TC0: empty input
                closes: vec![],
                period: 3,
                expected: vec![],
            },
            TestCase {
                // TC1: input shorter than period is entirely undefined
                closes: vec![1.0, 2.0],
                period: 3,
                expected: vec![None, None],
            },
            TestCase {
                // TC2: period 1 is the close itself
                closes: vec![5.0, 6.0, 7.0],
                period: 1,
                expected: vec![Some(5.0), Some(6.0), Some(7.0)],
            },
            TestCase {
                // TC3: seeded at index period - 1, then recurrence with k = 2/3
                closes: vec![2.0, 4.0, 6.0, 9.0],
                period: 2,
                expected: vec![None, Some(3.0), Some(5.0), Some(23.0 / 3.0)],
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = ema_series(&test.closes, test.period).unwrap();
            assert_eq!(actual.len(), test.expected.len(), "TC{} failed", index);
            for (actual, expected) in actual.iter().zip(test.expected.iter()) {
                match (actual, expected) {
                    (Some(actual), Some(expected)) => {
                        assert!((actual - expected).abs() < 1e-12, "TC{} failed", index)
                    }
                    (None, None) => {}
                    _ => panic!("TC{} failed: {actual:?} != {expected:?}", index),
                }
            }
        }
    }

    #[test]
    fn test_indicator_set_aligned_and_sorted() {
        let closes = (1..=10).map(f64::from).collect::<Vec<_>>();
        let set = IndicatorSet::compute(&closes, &[5, 2, 5, 8]).unwrap();

        assert_eq!(set.periods().collect::<Vec<_>>(), vec![2, 5, 8]);
        assert_eq!(set.len(), closes.len());
        for (_, series) in set.iter() {
            assert_eq!(series.len(), closes.len());
        }
        assert_eq!(set.series(8).unwrap()[6], None);
        assert!(set.series(8).unwrap()[7].is_some());
        assert!(set.series(3).is_none());
    }

    #[test]
    fn test_indicator_set_errors() {
        assert_eq!(
            IndicatorSet::compute(&[1.0], &[]).unwrap_err(),
            ComputationError::NoPeriods
        );
        assert_eq!(
            IndicatorSet::compute(&[1.0], &[20, 0]).unwrap_err(),
            ComputationError::ZeroPeriod
        );
    }

    #[test]
    fn test_latest_snapshot() {
        let closes = vec![10.0; 4];
        let latest = IndicatorSet::compute(&closes, &[2, 4, 8]).unwrap().latest();

        assert_eq!(
            latest.values(),
            &[(2, Some(10.0)), (4, Some(10.0)), (8, None)]
        );
        assert_eq!(latest.defined(), None);
    }

    #[test]
    fn test_snapshot_defined() {
        struct TestCase {
            input: LatestIndicatorSnapshot,
            expected: Option<Vec<f64>>,
        }

        let tests = vec![
            TestCase {
                // TC0: empty snapshot
                input: LatestIndicatorSnapshot::default(),
                expected: None,
            },
            TestCase {
                // TC1: sorted by period
                input: LatestIndicatorSnapshot::new([(50, Some(2.0)), (20, Some(1.0))]),
                expected: Some(vec![1.0, 2.0]),
            },
            TestCase {
                // TC2: NaN is treated as undefined
                input: LatestIndicatorSnapshot::new([(20, Some(1.0)), (50, Some(f64::NAN))]),
                expected: None,
            },
            TestCase {
                // TC3: missing value
                input: LatestIndicatorSnapshot::new([(20, Some(1.0)), (200, None)]),
                expected: None,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(test.input.defined(), test.expected, "TC{} failed", index);
        }
    }
}
