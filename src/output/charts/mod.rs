//! Box plots and bar charts rendered with plotters.
//!
//! Every chart compares the two groups with the same palette and labels
//! (`COVID` first, then `non-COVID`). Images are written as SVG; the
//! figures directory must already exist.

mod barchart;
mod boxplot;

pub use barchart::{render_bar_chart, render_grouped_bar_chart, BarChart, GroupedBarChart};
pub use boxplot::{render_box_plot, BoxEntry, BoxPlot};

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::core::Group;

/// ColorBrewer Set3, the qualitative palette used across all figures.
pub const SET3: [RGBColor; 12] = [
    RGBColor(0x8d, 0xd3, 0xc7),
    RGBColor(0xff, 0xff, 0xb3),
    RGBColor(0xbe, 0xba, 0xda),
    RGBColor(0xfb, 0x80, 0x72),
    RGBColor(0x80, 0xb1, 0xd3),
    RGBColor(0xfd, 0xb4, 0x62),
    RGBColor(0xb3, 0xde, 0x69),
    RGBColor(0xfc, 0xcd, 0xe5),
    RGBColor(0xd9, 0xd9, 0xd9),
    RGBColor(0xbc, 0x80, 0xbd),
    RGBColor(0xcc, 0xeb, 0xc5),
    RGBColor(0xff, 0xed, 0x6f),
];

/// Bar fill for single-series bar charts.
pub const BAR_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);

pub fn group_color(group: Group) -> RGBColor {
    match group {
        Group::Covid => SET3[0],
        Group::NonCovid => SET3[3],
    }
}

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl ChartOptions {
    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Axis labels and optional fixed value range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisStyle {
    pub x_label: String,
    pub y_label: String,
    pub y_range: Option<(f64, f64)>,
    pub y_step: Option<f64>,
}

impl AxisStyle {
    pub fn new(x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            x_label: x_label.into(),
            y_label: y_label.into(),
            ..Default::default()
        }
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    pub fn with_y_range(mut self, lo: f64, hi: f64) -> Self {
        self.y_range = Some((lo, hi));
        self
    }

    pub fn with_y_step(mut self, step: f64) -> Self {
        self.y_step = Some(step);
        self
    }

    /// Fixed range if configured, otherwise one that fits `values` and includes zero.
    pub(crate) fn resolve_range<'a, I>(&self, values: I) -> (f64, f64)
    where
        I: IntoIterator<Item = &'a f64>,
    {
        if let Some(range) = self.y_range {
            return range;
        }
        let (lo, hi) = values
            .into_iter()
            .fold((0.0f64, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if !hi.is_finite() || hi <= lo {
            return (lo, lo + 1.0);
        }
        (lo, hi + (hi - lo) * 0.05)
    }

    /// Number of y labels to request from the mesh.
    pub(crate) fn y_label_count(&self, range: (f64, f64)) -> usize {
        match self.y_step {
            Some(step) if step > 0.0 => ((range.1 - range.0) / step).floor() as usize + 1,
            _ => 10,
        }
    }
}

/// Label of the category sitting at integer position `x`, if any.
pub(crate) fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
