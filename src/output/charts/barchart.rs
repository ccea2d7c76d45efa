use plotters::prelude::*;
use std::path::Path;

use super::{category_label, group_color, AxisStyle, ChartOptions, BAR_COLOR};
use crate::core::{Error, Group, PerGroup, Result};

const BAR_HEIGHT: f64 = 0.8;
const GROUP_OFFSET: f64 = 0.2;

/// Horizontal bars, first entry on top.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub entries: Vec<(String, f64)>,
    pub axes: AxisStyle,
}

impl BarChart {
    pub fn new(entries: Vec<(String, f64)>, axes: AxisStyle) -> Self {
        Self { entries, axes }
    }
}

/// Vertical bars, one per group and category.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub categories: Vec<String>,
    pub values: PerGroup<Vec<f64>>,
    pub axes: AxisStyle,
}

pub fn render_bar_chart(path: &Path, chart: &BarChart, options: &ChartOptions) -> Result<()> {
    let chart_err = |e: &dyn std::fmt::Display| Error::chart(path, e);

    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(&e))?;

    let n = chart.entries.len().max(1) as f64;
    let range = chart.axes.resolve_range(chart.entries.iter().map(|(_, v)| v));
    // Longest label decides how much room the y axis needs.
    let label_width = chart
        .entries
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0) as u32
        * 7
        + 10;

    let mut plot = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(label_width)
        .build_cartesian_2d(range.0..range.1, -0.5f64..(n - 0.5))
        .map_err(|e| chart_err(&e))?;

    // Row 0 is drawn at the top.
    let labels: Vec<String> = chart.entries.iter().rev().map(|(name, _)| name.clone()).collect();
    let y_formatter = |y: &f64| category_label(&labels, *y);
    plot.configure_mesh()
        .disable_y_mesh()
        .y_labels(chart.entries.len() * 2 + 1)
        .y_label_formatter(&y_formatter)
        .x_labels(chart.axes.y_label_count(range))
        .x_desc(chart.axes.y_label.as_str())
        .y_desc(chart.axes.x_label.as_str())
        .draw()
        .map_err(|e| chart_err(&e))?;

    let last = chart.entries.len().saturating_sub(1);
    plot.draw_series(chart.entries.iter().enumerate().map(|(i, (_, value))| {
        let y = (last - i) as f64;
        let half = BAR_HEIGHT / 2.0;
        Rectangle::new([(range.0, y - half), (*value, y + half)], BAR_COLOR.filled())
    }))
    .map_err(|e| chart_err(&e))?;

    root.present().map_err(|e| chart_err(&e))?;
    Ok(())
}

pub fn render_grouped_bar_chart(
    path: &Path,
    chart: &GroupedBarChart,
    options: &ChartOptions,
) -> Result<()> {
    let chart_err = |e: &dyn std::fmt::Display| Error::chart(path, e);

    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(&e))?;

    let n = chart.categories.len().max(1) as f64;
    let range = chart
        .axes
        .resolve_range(chart.values.iter().flat_map(|(_, v)| v.iter()));

    let mut plot = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n - 0.5), range.0..range.1)
        .map_err(|e| chart_err(&e))?;

    let labels = chart.categories.clone();
    let x_formatter = |x: &f64| category_label(&labels, *x);
    plot.configure_mesh()
        .disable_x_mesh()
        .x_labels(chart.categories.len() * 2 + 1)
        .x_label_formatter(&x_formatter)
        .y_labels(chart.axes.y_label_count(range))
        .x_desc(chart.axes.x_label.as_str())
        .y_desc(chart.axes.y_label.as_str())
        .draw()
        .map_err(|e| chart_err(&e))?;

    for (j, group) in Group::ALL.into_iter().enumerate() {
        let color = group_color(group);
        let offset = if j == 0 { -GROUP_OFFSET } else { GROUP_OFFSET };
        plot.draw_series(chart.values.get(group).iter().enumerate().map(|(i, value)| {
            let x = i as f64 + offset;
            Rectangle::new(
                [(x - GROUP_OFFSET, range.0), (x + GROUP_OFFSET, *value)],
                color.filled(),
            )
        }))
        .map_err(|e| chart_err(&e))?
        .label(group.label())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    plot.configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(|e| chart_err(&e))?;

    root.present().map_err(|e| chart_err(&e))?;
    Ok(())
}
