//! Dispatch from `IndicatorType` requests to the indicator functions.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{IndicatorOutput, IndicatorType, ema, macd, moving_average, rsi};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ComputedIndicator {
    pub indicator_type: IndicatorType,
    pub outcome: Result<IndicatorOutput, IndicatorError>,
}

pub fn compute_indicator(
    closes: &[f64],
    indicator: &IndicatorType,
) -> Result<IndicatorOutput, IndicatorError> {
    let has_zero_parameter = match *indicator {
        IndicatorType::Sma(n) | IndicatorType::Ema(n) | IndicatorType::Rsi(n) => n == 0,
        IndicatorType::Macd { fast, slow, signal } => fast == 0 || slow == 0 || signal == 0,
    };
    if has_zero_parameter {
        return Err(IndicatorError::InvalidParameter {
            indicator: indicator.to_string(),
            reason: "window must be at least 1".into(),
        });
    }

    // moving_average itself stays total; here an all-undefined SMA is
    // reported like any other short input.
    if closes.len() < indicator.min_bars() {
        return Err(IndicatorError::InsufficientData {
            indicator: indicator.to_string(),
            bars: closes.len(),
            minimum: indicator.min_bars(),
        });
    }

    match *indicator {
        IndicatorType::Sma(window) => Ok(IndicatorOutput::Line(moving_average(closes, window))),
        IndicatorType::Ema(span) => Ok(IndicatorOutput::Line(ema(closes, span))),
        IndicatorType::Rsi(window) => rsi(closes, window).map(IndicatorOutput::Line),
        IndicatorType::Macd { fast, slow, signal } => {
            Ok(IndicatorOutput::Macd(macd(closes, fast, slow, signal)))
        }
    }
}

/// Computes each requested indicator once, in request order.
pub fn compute_indicators(closes: &[f64], indicators: &[IndicatorType]) -> Vec<ComputedIndicator> {
    let mut seen = HashSet::new();
    let mut computed = Vec::with_capacity(indicators.len());

    for indicator in indicators {
        if !seen.insert(indicator.clone()) {
            continue;
        }

        let outcome = compute_indicator(closes, indicator);
        match &outcome {
            Ok(output) => {
                tracing::debug!(indicator = %indicator, len = output.len(), "computed indicator");
            }
            Err(e) => {
                tracing::warn!(indicator = %indicator, "skipping indicator: {e}");
            }
        }

        computed.push(ComputedIndicator {
            indicator_type: indicator.clone(),
            outcome,
        });
    }

    computed
}
