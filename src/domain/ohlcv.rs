//! OHLCV bar representation.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// high >= max(open, close) and low <= min(open, close)
    pub fn is_consistent(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }

    /// Whether every numeric field is finite and non-negative.
    pub fn has_valid_numbers(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}
