//! Core domain types and logic.

pub mod chart_frame;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod interval;
pub mod ohlcv;
pub mod series;
pub mod summary;
