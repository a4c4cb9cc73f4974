//! Ordered bar series for one instrument and sampling interval.
//!
//! Construction is the one place where malformed input is caught: the
//! indicator functions downstream assume chronological order and finite
//! prices.

use crate::domain::error::StockdashError;
use crate::domain::interval::Interval;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub symbol: String,
    pub interval: Interval,
}

impl SeriesKey {
    pub fn new(symbol: &str, interval: Interval) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            interval,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.interval)
    }
}

#[derive(Debug, Clone)]
pub struct PriceSeries {
    key: SeriesKey,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(key: SeriesKey, bars: Vec<OhlcvBar>) -> Result<Self, StockdashError> {
        for (i, bar) in bars.iter().enumerate() {
            if !bar.has_valid_numbers() {
                return Err(StockdashError::MalformedInput {
                    symbol: key.symbol.clone(),
                    reason: format!(
                        "bar {} at {} has a non-finite or negative field",
                        i, bar.timestamp
                    ),
                });
            }
        }

        if let Some(i) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(StockdashError::MalformedInput {
                symbol: key.symbol.clone(),
                reason: format!(
                    "timestamps not strictly increasing at bar {} ({} after {})",
                    i + 1,
                    bars[i + 1].timestamp,
                    bars[i].timestamp
                ),
            });
        }

        Ok(Self { key, bars })
    }

    pub fn key(&self) -> &SeriesKey {
        &self.key
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.first().map(|b| b.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.last().map(|b| b.timestamp)
    }
}
