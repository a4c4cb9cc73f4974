//! Market data port trait.
//!
//! Implementations stand in for the remote market-data provider; the domain
//! only ever sees the bars they return.

use crate::domain::error::StockdashError;
use crate::domain::interval::Interval;
use crate::domain::ohlcv::OhlcvBar;
use chrono::{NaiveDate, NaiveDateTime};

pub trait DataPort {
    /// Bars whose date falls within `[start_date, end_date]`, oldest first.
    fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, StockdashError>;

    fn list_symbols(&self, interval: Interval) -> Result<Vec<String>, StockdashError>;

    /// First timestamp, last timestamp and bar count, or `None` when there is no data.
    fn get_data_range(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, StockdashError>;
}
