//! Output port handing finished chart frames to a presentation layer.

use crate::domain::chart_frame::ChartFrame;
use crate::domain::error::StockdashError;
use std::path::Path;

pub trait ChartPort {
    fn write(&self, frame: &ChartFrame, output_path: &Path) -> Result<(), StockdashError>;
}
