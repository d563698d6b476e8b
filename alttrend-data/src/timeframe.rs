use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Candle resolution supported by the scanner.
///
/// Serialises to the Binance kline interval notation, eg/ "15m".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "3m")]
    M3,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "2h")]
    H2,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "6h")]
    H6,
    #[serde(rename = "8h")]
    H8,
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "3d")]
    D3,
    #[serde(rename = "1w")]
    W1,
}

impl Timeframe {
    /// Every supported [`Timeframe`], shortest first.
    pub const ALL: [Timeframe; 14] = [
        Timeframe::M1,
        Timeframe::M3,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H2,
        Timeframe::H4,
        Timeframe::H6,
        Timeframe::H8,
        Timeframe::H12,
        Timeframe::D1,
        Timeframe::D3,
        Timeframe::W1,
    ];

    /// Binance kline interval notation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M3 => "3m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H2 => "2h",
            Timeframe::H4 => "4h",
            Timeframe::H6 => "6h",
            Timeframe::H8 => "8h",
            Timeframe::H12 => "12h",
            Timeframe::D1 => "1d",
            Timeframe::D3 => "3d",
            Timeframe::W1 => "1w",
        }
    }

    /// Duration of a single candle.
    pub fn duration(&self) -> TimeDelta {
        match self {
            Timeframe::M1 => TimeDelta::minutes(1),
            Timeframe::M3 => TimeDelta::minutes(3),
            Timeframe::M5 => TimeDelta::minutes(5),
            Timeframe::M15 => TimeDelta::minutes(15),
            Timeframe::M30 => TimeDelta::minutes(30),
            Timeframe::H1 => TimeDelta::hours(1),
            Timeframe::H2 => TimeDelta::hours(2),
            Timeframe::H4 => TimeDelta::hours(4),
            Timeframe::H6 => TimeDelta::hours(6),
            Timeframe::H8 => TimeDelta::hours(8),
            Timeframe::H12 => TimeDelta::hours(12),
            Timeframe::D1 => TimeDelta::days(1),
            Timeframe::D3 => TimeDelta::days(3),
            Timeframe::W1 => TimeDelta::weeks(1),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported timeframe: {0}")]
pub struct ParseTimeframeError(pub String);

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Timeframe::ALL
            .into_iter()
            .find(|timeframe| timeframe.as_str() == s)
            .ok_or_else(|| ParseTimeframeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_notation_round_trips() {
        for timeframe in Timeframe::ALL {
            assert_eq!(timeframe.as_str().parse::<Timeframe>(), Ok(timeframe));
            assert_eq!(
                serde_json::to_string(&timeframe).unwrap(),
                format!("\"{timeframe}\"")
            );
        }
    }

    #[test]
    fn test_timeframe_from_str_rejects_unknown() {
        assert_eq!(" 4h ".parse::<Timeframe>(), Ok(Timeframe::H4));
        assert!("1M".parse::<Timeframe>().is_err());
        assert!("".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_timeframes_are_ordered_by_duration() {
        assert!(
            Timeframe::ALL
                .windows(2)
                .all(|pair| pair[0].duration() < pair[1].duration())
        );
    }
}
