#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
pub use stockdash::domain::ohlcv::OhlcvBar;
use stockdash::domain::chart_frame::ChartFrame;
use stockdash::domain::error::StockdashError;
use stockdash::domain::interval::Interval;
use stockdash::ports::chart_port::ChartPort;
use stockdash::ports::data_port::DataPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn check_error(&self, symbol: &str) -> Result<(), StockdashError> {
        match self.errors.get(symbol) {
            Some(reason) => Err(StockdashError::Data {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        _interval: Interval,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, StockdashError> {
        self.check_error(symbol)?;
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| {
                        let date = b.timestamp.date();
                        date >= start_date && date <= end_date
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self, _interval: Interval) -> Result<Vec<String>, StockdashError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
        _interval: Interval,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, StockdashError> {
        self.check_error(symbol)?;
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.timestamp).min().unwrap();
                let max = bars.iter().map(|b| b.timestamp).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

/// Records written frames instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingChartPort {
    pub written: RefCell<Vec<(PathBuf, ChartFrame)>>,
}

impl RecordingChartPort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartPort for RecordingChartPort {
    fn write(&self, frame: &ChartFrame, output_path: &Path) -> Result<(), StockdashError> {
        self.written
            .borrow_mut()
            .push((output_path.to_path_buf(), frame.clone()));
        Ok(())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        timestamp: date(date_str).and_hms_opt(0, 0, 0).unwrap(),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000.0,
    }
}

/// One daily bar per close, starting at `start`.
pub fn make_daily_bars(start: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let day = start + chrono::Duration::days(i as i64);
            make_bar(&day.format("%Y-%m-%d").to_string(), close)
        })
        .collect()
}

/// Closes rising by 1.0 from `base`.
pub fn rising_closes(base: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| base + i as f64).collect()
}
