//! Chart frame: derived series aligned to the bar timestamps, ready for a
//! presentation layer.

use crate::domain::indicator::{DerivedSeries, IndicatorOutput, IndicatorType};
use crate::domain::indicator_helpers::ComputedIndicator;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::{PriceSeries, SeriesKey};

#[derive(Debug, Clone, PartialEq)]
pub struct FrameColumn {
    pub name: String,
    pub values: DerivedSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedIndicator {
    pub indicator: IndicatorType,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ChartFrame {
    pub key: SeriesKey,
    pub bars: Vec<OhlcvBar>,
    pub columns: Vec<FrameColumn>,
    pub skipped: Vec<SkippedIndicator>,
}

impl ChartFrame {
    pub fn build(series: &PriceSeries, computed: Vec<ComputedIndicator>) -> Self {
        let mut columns = Vec::new();
        let mut skipped = Vec::new();

        for ComputedIndicator {
            indicator_type,
            outcome,
        } in computed
        {
            match outcome {
                Ok(IndicatorOutput::Line(values)) => columns.push(FrameColumn {
                    name: indicator_type.to_string(),
                    values,
                }),
                Ok(IndicatorOutput::Macd(macd)) => {
                    let name = indicator_type.to_string();
                    let histogram = macd.histogram();
                    columns.push(FrameColumn {
                        name: name.clone(),
                        values: macd.macd_line,
                    });
                    columns.push(FrameColumn {
                        name: format!("{name} signal"),
                        values: macd.signal_line,
                    });
                    columns.push(FrameColumn {
                        name: format!("{name} histogram"),
                        values: histogram,
                    });
                }
                Err(e) => skipped.push(SkippedIndicator {
                    indicator: indicator_type,
                    reason: e.to_string(),
                }),
            }
        }

        Self {
            key: series.key().clone(),
            bars: series.bars().to_vec(),
            columns,
            skipped,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&FrameColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
