//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Both EMAs are seeded with the first value, so every line is defined from index 0.

use crate::domain::indicator::ema::ema_raw;
use crate::domain::indicator::MacdSeries;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn macd(series: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdSeries {
    let ema_fast = ema_raw(series, fast);
    let ema_slow = ema_raw(series, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_raw(&macd_line, signal_span);

    MacdSeries {
        macd_line: macd_line.into(),
        signal_line: signal_line.into(),
    }
}

pub fn macd_default(series: &[f64]) -> MacdSeries {
    macd(series, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
