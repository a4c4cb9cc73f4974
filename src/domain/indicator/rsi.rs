//! RSI (Relative Strength Index).
//!
//! Average gain/loss are simple rolling means of the per-bar gains and
//! losses over the last n price changes (no Wilder smoothing).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 when avg_gain > 0, 50 for a flat window.
//!
//! Warmup: first n positions are undefined (n price changes are needed).

use crate::domain::error::IndicatorError;
use crate::domain::indicator::moving_average::rolling_mean;
use crate::domain::indicator::{DerivedSeries, IndicatorType};

pub fn rsi(series: &[f64], window: usize) -> Result<DerivedSeries, IndicatorError> {
    let indicator = IndicatorType::Rsi(window);
    if window == 0 {
        return Err(IndicatorError::InvalidParameter {
            indicator: indicator.to_string(),
            reason: "window must be at least 1".into(),
        });
    }
    if series.len() < indicator.min_bars() {
        return Err(IndicatorError::InsufficientData {
            indicator: indicator.to_string(),
            bars: series.len(),
            minimum: indicator.min_bars(),
        });
    }

    let mut gains = Vec::with_capacity(series.len());
    let mut losses = Vec::with_capacity(series.len());
    gains.push(None);
    losses.push(None);

    for pair in series.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(Some(change.max(0.0)));
        losses.push(Some((-change).max(0.0)));
    }

    let avg_gain = rolling_mean(&gains, window);
    let avg_loss = rolling_mean(&losses, window);

    Ok(avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(gain, loss)| Some(rsi_from_averages(gain?, loss?)))
        .collect())
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 { 100.0 } else { 50.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
