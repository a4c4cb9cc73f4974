//! CSV file data adapter.
//!
//! One file per symbol and interval, `<base>/<SYMBOL>_<interval>.csv`, with
//! header `timestamp,open,high,low,close,volume`.

use crate::domain::error::StockdashError;
use crate::domain::interval::Interval;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: Interval) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol.to_uppercase(), interval))
    }

    fn read_bars(&self, symbol: &str, interval: Interval) -> Result<Vec<OhlcvBar>, StockdashError> {
        let path = self.csv_path(symbol, interval);
        let content = fs::read_to_string(&path).map_err(|e| StockdashError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| StockdashError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let bar = OhlcvBar {
                timestamp: parse_timestamp(field(&record, 0, "timestamp")?)?,
                open: parse_number(&record, 1, "open")?,
                high: parse_number(&record, 2, "high")?,
                low: parse_number(&record, 3, "low")?,
                close: parse_number(&record, 4, "close")?,
                volume: parse_number(&record, 5, "volume")?,
            };

            if !bar.is_consistent() {
                tracing::warn!(
                    symbol,
                    row = line + 1,
                    timestamp = %bar.timestamp,
                    "bar violates high/low bounds"
                );
            }
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

fn field<'r>(record: &'r StringRecord, index: usize, name: &str) -> Result<&'r str, StockdashError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| StockdashError::Data {
            reason: format!("missing {} column", name),
        })
}

fn parse_number(record: &StringRecord, index: usize, name: &str) -> Result<f64, StockdashError> {
    field(record, index, name)?
        .parse()
        .map_err(|e| StockdashError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, StockdashError> {
    if let Some(ts) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(ts);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| StockdashError::Data {
            reason: format!("invalid timestamp format: {}", value),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, StockdashError> {
        let bars = self.read_bars(symbol, interval)?;
        Ok(bars
            .into_iter()
            .filter(|b| {
                let date = b.timestamp.date();
                date >= start_date && date <= end_date
            })
            .collect())
    }

    fn list_symbols(&self, interval: Interval) -> Result<Vec<String>, StockdashError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StockdashError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", interval);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StockdashError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(&suffix) {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, StockdashError> {
        if !self.csv_path(symbol, interval).exists() {
            return Ok(None);
        }

        let bars = self.read_bars(symbol, interval)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp, bars.len())),
            _ => None,
        })
    }
}
