//! Headline numbers for a price series: last close, change, range, volume.

use crate::domain::interval::Interval;
use crate::domain::series::PriceSeries;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub symbol: String,
    pub interval: Interval,
    pub bar_count: usize,
    pub first_timestamp: NaiveDateTime,
    pub last_timestamp: NaiveDateTime,
    pub last_close: f64,
    /// Last close minus the previous close.
    pub change: Option<f64>,
    /// `change` as a fraction of the previous close.
    pub change_pct: Option<f64>,
    pub period_high: f64,
    pub period_low: f64,
    pub total_volume: f64,
}

impl SeriesSummary {
    pub fn compute(series: &PriceSeries) -> Option<Self> {
        let bars = series.bars();
        let last = bars.last()?;
        let first = bars.first()?;

        let prev_close = bars.len().checked_sub(2).map(|i| bars[i].close);
        let change = prev_close.map(|prev| last.close - prev);
        let change_pct = prev_close
            .filter(|prev| *prev != 0.0)
            .map(|prev| (last.close - prev) / prev);

        let period_high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let period_low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let total_volume = bars.iter().map(|b| b.volume).sum();

        Some(Self {
            symbol: series.key().symbol.clone(),
            interval: series.key().interval,
            bar_count: bars.len(),
            first_timestamp: first.timestamp,
            last_timestamp: last.timestamp,
            last_close: last.close,
            change,
            change_pct,
            period_high,
            period_low,
            total_volume,
        })
    }
}
