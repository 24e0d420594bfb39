//! Chart styling options.

use fwatch_config::ChartConfig;
use serde::{Deserialize, Serialize};

/// Styling for the follower trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Caption above the plot
    pub title: String,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
    /// Hex color of the line and its markers
    pub line_color: String,
    /// Hex background color
    pub background_color: String,
    /// Draw grid lines behind the series
    pub show_grid: bool,
    /// Caption font size in points
    pub title_font_size: u32,
    /// Marker radius in pixels
    pub marker_size: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::from(&ChartConfig::default())
    }
}

impl From<&ChartConfig> for ChartOptions {
    fn from(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            title: config.title.clone(),
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            line_color: config.line_color.clone(),
            background_color: config.background_color.clone(),
            show_grid: config.show_grid,
            title_font_size: 24,
            marker_size: 3,
        }
    }
}
