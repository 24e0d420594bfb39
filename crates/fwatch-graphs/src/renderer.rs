//! Chart rendering trait and color helpers

use crate::ChartOptions;
use fwatch_common::{Result, Sample};
use plotters::style::RGBColor;
use std::path::Path;

/// Fallback when a configured line color does not parse
pub const DEFAULT_LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Trait for rendering a follower series to an image
#[async_trait::async_trait]
pub trait ChartRenderer {
    /// Render the samples to a PNG file at `path`.
    ///
    /// Fails on an empty sample slice.
    async fn render_to_file(
        &self,
        options: &ChartOptions,
        samples: &[Sample],
        path: &Path,
    ) -> Result<()>;

    /// Line color from the options
    fn line_color(&self, options: &ChartOptions) -> RGBColor {
        parse_hex_color(&options.line_color).unwrap_or(DEFAULT_LINE_COLOR)
    }

    /// Background color from the options
    fn background_color(&self, options: &ChartOptions) -> RGBColor {
        parse_hex_color(&options.background_color).unwrap_or(RGBColor(255, 255, 255))
    }
}

/// Parse a `#RRGGBB` string
pub fn parse_hex_color(color_str: &str) -> Option<RGBColor> {
    let hex = color_str.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1f77b4"), Some(RGBColor(31, 119, 180)));
        assert_eq!(parse_hex_color("#FFFFFF"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_hex_color("1f77b4"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zz0000"), None);
    }
}
