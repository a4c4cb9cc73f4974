//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first value, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No bias correction, so there is no warmup: every position is defined.

use crate::domain::indicator::DerivedSeries;

pub fn ema(series: &[f64], span: usize) -> DerivedSeries {
    ema_raw(series, span).into()
}

/// Same recurrence as [`ema`], returning plain values for chaining.
pub(crate) fn ema_raw(series: &[f64], span: usize) -> Vec<f64> {
    let k = 2.0 / (span as f64 + 1.0);
    let mut values = Vec::with_capacity(series.len());

    let mut iter = series.iter();
    if let Some(&first) = iter.next() {
        let mut prev = first;
        values.push(prev);
        for &close in iter {
            prev = k * close + (1.0 - k) * prev;
            values.push(prev);
        }
    }

    values
}
