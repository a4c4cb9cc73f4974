//! CSV chart-frame writer.
//!
//! Header: `timestamp,open,high,low,close,volume,<indicator columns...>`.
//! Undefined indicator positions are written as empty cells.

use crate::domain::chart_frame::ChartFrame;
use crate::domain::error::StockdashError;
use crate::ports::chart_port::ChartPort;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Default)]
pub struct CsvChartAdapter;

impl CsvChartAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Writes the frame to any writer; [`ChartPort::write`] wraps this with a file.
    pub fn write_to<W: Write>(&self, frame: &ChartFrame, out: W) -> Result<(), StockdashError> {
        let mut wtr = csv::Writer::from_writer(out);
        let csv_err = |e: csv::Error| StockdashError::Io(std::io::Error::other(e));

        let mut header = vec!["timestamp", "open", "high", "low", "close", "volume"];
        header.extend(frame.column_names());
        wtr.write_record(&header).map_err(csv_err)?;

        let ts_format = if frame.key.interval.is_intraday() {
            "%Y-%m-%d %H:%M:%S"
        } else {
            "%Y-%m-%d"
        };

        for (i, bar) in frame.bars.iter().enumerate() {
            let mut row = vec![
                bar.timestamp.format(ts_format).to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ];
            row.extend(
                frame
                    .columns
                    .iter()
                    .map(|c| c.values.get(i).map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&row).map_err(csv_err)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl ChartPort for CsvChartAdapter {
    fn write(&self, frame: &ChartFrame, output_path: &Path) -> Result<(), StockdashError> {
        let file = std::fs::File::create(output_path)?;
        self.write_to(frame, std::io::BufWriter::new(file))?;
        tracing::info!(
            path = %output_path.display(),
            rows = frame.len(),
            columns = frame.columns.len(),
            "chart frame written"
        );
        Ok(())
    }
}
