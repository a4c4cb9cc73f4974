//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(C[i-n+1..=i]) / n
//! Warmup: first (n-1) positions are undefined. A window longer than the
//! input leaves the whole output undefined; the output is never shorter
//! than the input.

use crate::domain::indicator::DerivedSeries;

pub fn moving_average(series: &[f64], window: usize) -> DerivedSeries {
    let values: Vec<Option<f64>> = series.iter().copied().map(Some).collect();
    rolling_mean(&values, window)
}

/// Rolling mean over values that may themselves be undefined. Any window
/// touching an undefined value is undefined.
pub(crate) fn rolling_mean(values: &[Option<f64>], window: usize) -> DerivedSeries {
    if window == 0 || window > values.len() {
        return DerivedSeries::undefined(values.len());
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let mut sum = 0.0;
            for v in &values[i + 1 - window..=i] {
                sum += (*v)?;
            }
            Some(sum / window as f64)
        })
        .collect()
}
