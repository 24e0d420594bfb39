//! Follower trend line chart.
//!
//! Plots follower count against elapsed seconds since the first sample,
//! with axis ticks labelled in local wall-clock time.

use crate::renderer::ChartRenderer;
use crate::ChartOptions;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local};
use fwatch_common::{FwatchError, Result, Sample};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info};

/// Coordinates and axis ranges derived from a sample slice.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlotLayout {
    pub origin: DateTime<Local>,
    pub span_secs: f64,
    pub points: Vec<(f64, f64)>,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
}

impl PlotLayout {
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let origin = samples.first()?.timestamp;
        let points: Vec<(f64, f64)> = samples
            .iter()
            .map(|s| {
                let offset = (s.timestamp - origin).num_milliseconds() as f64 / 1000.0;
                (offset, s.followers as f64)
            })
            .collect();

        let span_secs = points.last().map_or(0.0, |(x, _)| *x);
        let (low, high) = points
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
        let pad = ((high - low) * 0.1).max(1.0);

        Some(Self {
            origin,
            span_secs,
            points,
            x_range: 0.0..span_secs.max(1.0),
            y_range: (low - pad).max(0.0)..(high + pad),
        })
    }

    /// Tick label for an x offset; finer precision for shorter sessions.
    pub fn time_label(&self, offset_secs: f64) -> String {
        let at = self.origin + Duration::milliseconds((offset_secs * 1000.0) as i64);
        let pattern = if self.span_secs >= 86_400.0 {
            "%m-%d %H:%M"
        } else if self.span_secs >= 600.0 {
            "%H:%M"
        } else {
            "%H:%M:%S"
        };
        at.format(pattern).to_string()
    }
}

/// Renders follower counts over time as a PNG line chart with point markers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendChart;

impl TrendChart {
    /// Creates a renderer.
    pub fn new() -> Self {
        Self
    }

    fn draw(&self, options: &ChartOptions, layout: &PlotLayout, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
        root.fill(&self.background_color(options))?;

        let line_color = self.line_color(options);

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", options.title_font_size))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(layout.x_range.clone(), layout.y_range.clone())?;

        let x_formatter = |offset: &f64| layout.time_label(*offset);
        let y_formatter = |count: &f64| format!("{count:.0}");

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(options.x_label.as_str())
            .y_desc(options.y_label.as_str())
            .x_labels(6)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter);
        if !options.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        chart.draw_series(LineSeries::new(layout.points.iter().copied(), &line_color))?;
        chart.draw_series(
            layout
                .points
                .iter()
                .map(|point| Circle::new(*point, options.marker_size, line_color.filled())),
        )?;

        root.present()?;
        Ok(())
    }
}

#[async_trait]
impl ChartRenderer for TrendChart {
    async fn render_to_file(
        &self,
        options: &ChartOptions,
        samples: &[Sample],
        path: &Path,
    ) -> Result<()> {
        let layout = PlotLayout::from_samples(samples)
            .ok_or_else(|| FwatchError::graph("No data to export"))?;
        debug!(points = layout.points.len(), "Rendering trend chart");

        // PNG encoding and the file write block
        let chart = *self;
        let options = options.clone();
        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || chart.draw(&options, &layout, &target))
            .await
            .map_err(|e| FwatchError::graph(format!("Chart rendering task failed: {e}")))??;
        info!("Successfully rendered trend chart to {:?}", path);
        Ok(())
    }
}
