//! # fwatch Graphs
//!
//! Exports a recorded follower series: CSV for spreadsheets and a PNG
//! trend chart rendered with plotters.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod csv_export;
pub mod renderer;
pub mod trend_chart;
pub mod types;

pub use csv_export::{CsvExporter, UTF8_BOM};
pub use renderer::{parse_hex_color, ChartRenderer};
pub use trend_chart::TrendChart;
pub use types::ChartOptions;
