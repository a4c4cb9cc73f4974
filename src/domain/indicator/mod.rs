//! Technical indicator implementations.
//!
//! This module provides the types shared by every indicator:
//! - `DerivedSeries`: a computed series aligned with its source, `None` where undefined
//! - `MacdSeries`: the MACD line paired with its signal line
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `IndicatorOutput`: the shape an indicator produces
//!
//! The computations themselves are pure functions over `&[f64]` in the submodules.

pub mod ema;
pub mod macd;
pub mod moving_average;
pub mod rsi;

pub use ema::ema;
pub use macd::{macd, macd_default};
pub use moving_average::moving_average;
pub use rsi::rsi;

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_RSI_WINDOW: usize = 14;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedSeries {
    values: Vec<Option<f64>>,
}

impl DerivedSeries {
    pub fn undefined(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn first_defined_index(&self) -> Option<usize> {
        self.values.iter().position(|v| v.is_some())
    }

    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().copied()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Option<f64>> {
        self.values
    }
}

impl From<Vec<Option<f64>>> for DerivedSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }
}

impl From<Vec<f64>> for DerivedSeries {
    fn from(values: Vec<f64>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
        }
    }
}

impl FromIterator<Option<f64>> for DerivedSeries {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd_line: DerivedSeries,
    pub signal_line: DerivedSeries,
}

impl MacdSeries {
    /// MACD line minus signal line, undefined wherever either side is.
    pub fn histogram(&self) -> DerivedSeries {
        self.macd_line
            .iter()
            .zip(self.signal_line.iter())
            .map(|(line, signal)| Some(line? - signal?))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl IndicatorType {
    pub fn macd_default() -> Self {
        IndicatorType::Macd {
            fast: macd::DEFAULT_FAST,
            slow: macd::DEFAULT_SLOW,
            signal: macd::DEFAULT_SIGNAL,
        }
    }

    /// Minimum number of bars for a computable result.
    pub fn min_bars(&self) -> usize {
        match self {
            IndicatorType::Sma(window) => *window,
            IndicatorType::Ema(_) | IndicatorType::Macd { .. } => 1,
            IndicatorType::Rsi(window) => window.saturating_add(1),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(window) => write!(f, "SMA({})", window),
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(window) => write!(f, "RSI({})", window),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse indicator '{input}': {reason}")]
pub struct ParseIndicatorError {
    pub input: String,
    pub reason: String,
}

impl FromStr for IndicatorType {
    type Err = ParseIndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let fail = |reason: &str| ParseIndicatorError {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (name, args) = match input.find('(') {
            Some(open) => {
                let inner = input[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| fail("missing closing parenthesis"))?;
                let args = inner
                    .split(',')
                    .map(|a| {
                        a.trim()
                            .parse::<usize>()
                            .map_err(|_| fail("arguments must be positive integers"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                (input[..open].trim(), args)
            }
            None => (input, Vec::new()),
        };

        if args.contains(&0) {
            return Err(fail("arguments must be positive integers"));
        }

        match (name.to_uppercase().as_str(), args.as_slice()) {
            ("SMA", [window]) => Ok(IndicatorType::Sma(*window)),
            ("EMA", [span]) => Ok(IndicatorType::Ema(*span)),
            ("RSI", []) => Ok(IndicatorType::Rsi(DEFAULT_RSI_WINDOW)),
            ("RSI", [window]) => Ok(IndicatorType::Rsi(*window)),
            ("MACD", []) => Ok(IndicatorType::macd_default()),
            ("MACD", [fast, slow, signal]) => {
                if fast >= slow {
                    return Err(fail("fast span must be shorter than slow span"));
                }
                Ok(IndicatorType::Macd {
                    fast: *fast,
                    slow: *slow,
                    signal: *signal,
                })
            }
            ("SMA" | "EMA" | "RSI" | "MACD", _) => Err(fail("wrong number of arguments")),
            _ => Err(fail("unknown indicator")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    Line(DerivedSeries),
    Macd(MacdSeries),
}

impl IndicatorOutput {
    pub fn len(&self) -> usize {
        match self {
            IndicatorOutput::Line(series) => series.len(),
            IndicatorOutput::Macd(macd) => macd.macd_line.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
