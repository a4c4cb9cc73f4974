//! Configuration validation and the resolved dashboard configuration.
//!
//! Validates every field before any data is read, then resolves the INI
//! values into a [`DashboardConfig`].

use crate::domain::error::StockdashError;
use crate::domain::indicator::{DEFAULT_RSI_WINDOW, IndicatorType};
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::interval::Interval;
use crate::domain::series::SeriesKey;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub const DEFAULT_SMA_WINDOWS: [usize; 2] = [20, 50];

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub key: SeriesKey,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub indicators: Vec<IndicatorType>,
    pub output_path: Option<PathBuf>,
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    validate_data_dir(config)?;
    parse_interval(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    parse_window_list(config, "sma", &DEFAULT_SMA_WINDOWS)?;
    parse_window_list(config, "ema", &[])?;
    parse_count(config, "indicators", "rsi_window", DEFAULT_RSI_WINDOW)?;
    if config.get_bool("indicators", "macd", true) {
        validate_macd(config)?;
    }
    Ok(())
}

/// Validates the whole file and resolves it. CLI overrides win over the file.
pub fn build_dashboard_config(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
    interval_override: Option<Interval>,
) -> Result<DashboardConfig, StockdashError> {
    validate_data_config(config)?;
    validate_indicator_config(config)?;

    let symbol = match symbol_override.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => config
            .get_non_empty("data", "symbol")
            .ok_or_else(|| missing("data", "symbol"))?,
    };
    let interval = match interval_override {
        Some(i) => i,
        None => parse_interval(config)?,
    };
    let (start_date, end_date) = validate_dates(config)?;

    Ok(DashboardConfig {
        data_dir: PathBuf::from(
            config
                .get_non_empty("data", "data_dir")
                .ok_or_else(|| missing("data", "data_dir"))?,
        ),
        key: SeriesKey::new(&symbol, interval),
        start_date,
        end_date,
        indicators: build_indicator_list(config)?,
        output_path: config.get_non_empty("output", "path").map(PathBuf::from),
    })
}

pub fn build_indicator_list(config: &dyn ConfigPort) -> Result<Vec<IndicatorType>, StockdashError> {
    let mut indicators: Vec<IndicatorType> = parse_window_list(config, "sma", &DEFAULT_SMA_WINDOWS)?
        .into_iter()
        .map(IndicatorType::Sma)
        .collect();
    indicators.extend(
        parse_window_list(config, "ema", &[])?
            .into_iter()
            .map(IndicatorType::Ema),
    );

    let rsi_window = parse_count(config, "indicators", "rsi_window", DEFAULT_RSI_WINDOW)?;
    if rsi_window > 0 {
        indicators.push(IndicatorType::Rsi(rsi_window));
    }

    if config.get_bool("indicators", "macd", true) {
        let (fast, slow, signal) = validate_macd(config)?;
        indicators.push(IndicatorType::Macd { fast, slow, signal });
    }

    Ok(indicators)
}

fn missing(section: &str, key: &str) -> StockdashError {
    StockdashError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> StockdashError {
    StockdashError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    match config.get_non_empty("data", "data_dir") {
        Some(_) => Ok(()),
        None => Err(missing("data", "data_dir")),
    }
}

/// `[data] interval`, defaulting to daily when absent.
pub fn parse_interval(config: &dyn ConfigPort) -> Result<Interval, StockdashError> {
    match config.get_non_empty("data", "interval") {
        None => Ok(Interval::default()),
        Some(s) => s
            .parse::<Interval>()
            .map_err(|e| invalid("data", "interval", e.to_string())),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), StockdashError> {
    let start_date = parse_date(config.get_non_empty("data", "start_date").as_deref(), "start_date")?;
    let end_date = parse_date(config.get_non_empty("data", "end_date").as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "data",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok((start_date, end_date))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, StockdashError> {
    match value {
        None => Err(missing("data", field)),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            invalid(
                "data",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

/// Comma-separated list of positive windows. Absent key gives `default`,
/// a blank value gives an empty list.
fn parse_window_list(
    config: &dyn ConfigPort,
    key: &str,
    default: &[usize],
) -> Result<Vec<usize>, StockdashError> {
    let raw = match config.get_string("indicators", key) {
        None => return Ok(default.to_vec()),
        Some(raw) => raw,
    };

    let mut windows = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<usize>() {
            Ok(w) if w > 0 => windows.push(w),
            _ => {
                return Err(invalid(
                    "indicators",
                    key,
                    format!("'{}' is not a positive integer", token),
                ));
            }
        }
    }
    Ok(windows)
}

fn parse_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, StockdashError> {
    match config.get_non_empty(section, key) {
        None => Ok(default),
        Some(s) => s
            .parse::<usize>()
            .map_err(|_| invalid(section, key, format!("'{}' is not a non-negative integer", s))),
    }
}

fn validate_macd(config: &dyn ConfigPort) -> Result<(usize, usize, usize), StockdashError> {
    let fast = parse_count(config, "indicators", "macd_fast", DEFAULT_FAST)?;
    let slow = parse_count(config, "indicators", "macd_slow", DEFAULT_SLOW)?;
    let signal = parse_count(config, "indicators", "macd_signal", DEFAULT_SIGNAL)?;

    for (key, value) in [("macd_fast", fast), ("macd_slow", slow), ("macd_signal", signal)] {
        if value == 0 {
            return Err(invalid("indicators", key, format!("{} must be at least 1", key)));
        }
    }
    if fast >= slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }
    Ok((fast, slow, signal))
}
