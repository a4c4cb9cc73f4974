//! Sampling interval of a bar series.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    Minute1,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }

    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::Minute1
                | Interval::Minute5
                | Interval::Minute15
                | Interval::Minute30
                | Interval::Hour1
        )
    }

    pub fn all() -> &'static [Interval] {
        &[
            Interval::Minute1,
            Interval::Minute5,
            Interval::Minute15,
            Interval::Minute30,
            Interval::Hour1,
            Interval::Daily,
            Interval::Weekly,
            Interval::Monthly,
        ]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interval '{0}', expected one of 1m, 5m, 15m, 30m, 1h, 1d, 1wk, 1mo")]
pub struct ParseIntervalError(pub String);

impl FromStr for Interval {
    type Err = ParseIntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Interval::all()
            .iter()
            .copied()
            .find(|i| i.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseIntervalError(trimmed.to_string()))
    }
}
