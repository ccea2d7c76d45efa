use plotters::prelude::*;
use std::iter;
use std::path::Path;

use super::{category_label, group_color, AxisStyle, ChartOptions};
use crate::core::{Error, Group, PerGroup, Result};
use crate::stats::Summary;

const BOX_WIDTH: f64 = 0.6;
const WHISKER_SPAN: f64 = 1.5;

/// One box: its position on the category axis and the raw sample.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxEntry {
    pub center: f64,
    pub width: f64,
    pub color: RGBColor,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlot {
    pub categories: Vec<String>,
    pub boxes: Vec<BoxEntry>,
    pub axes: AxisStyle,
    /// Groups to list in the legend when boxes share a category.
    pub legend: Vec<Group>,
}

impl BoxPlot {
    /// One box per group, groups along the x axis.
    pub fn by_group(samples: &PerGroup<Vec<f64>>, axes: AxisStyle) -> Self {
        let boxes = samples
            .iter()
            .enumerate()
            .map(|(i, (group, values))| BoxEntry {
                center: i as f64,
                width: BOX_WIDTH,
                color: group_color(group),
                values: values.clone(),
            })
            .collect();

        Self {
            categories: Group::ALL.iter().map(|g| g.label().to_string()).collect(),
            boxes,
            axes,
            legend: Vec::new(),
        }
    }

    /// Categories along the x axis, one box per group side by side.
    pub fn by_category(categories: &[(String, PerGroup<Vec<f64>>)], axes: AxisStyle) -> Self {
        let half = BOX_WIDTH / 2.0;
        let boxes = categories
            .iter()
            .enumerate()
            .flat_map(|(i, (_, samples))| {
                samples.iter().enumerate().map(move |(j, (group, values))| BoxEntry {
                    center: i as f64 - half / 2.0 + j as f64 * half,
                    width: half * 0.9,
                    color: group_color(group),
                    values: values.clone(),
                })
            })
            .collect();

        Self {
            categories: categories.iter().map(|(name, _)| name.clone()).collect(),
            boxes,
            axes,
            legend: Group::ALL.to_vec(),
        }
    }
}

/// Whisker ends and outliers of a sample using the 1.5 * IQR rule.
fn whiskers(values: &[f64], summary: &Summary) -> (f64, f64, Vec<f64>) {
    let lo_fence = summary.q1 - WHISKER_SPAN * summary.iqr();
    let hi_fence = summary.q3 + WHISKER_SPAN * summary.iqr();

    let inside = values.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
    let lo = inside.clone().fold(summary.q1, f64::min);
    let hi = inside.fold(summary.q3, f64::max);
    let outliers = values
        .iter()
        .copied()
        .filter(|v| !(lo_fence..=hi_fence).contains(v))
        .collect();
    (lo, hi, outliers)
}

pub fn render_box_plot(path: &Path, plot: &BoxPlot, options: &ChartOptions) -> Result<()> {
    let chart_err = |e: &dyn std::fmt::Display| Error::chart(path, e);

    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(&e))?;

    let range = plot
        .axes
        .resolve_range(plot.boxes.iter().flat_map(|b| b.values.iter()));
    let n = plot.categories.len().max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n - 0.5), range.0..range.1)
        .map_err(|e| chart_err(&e))?;

    let labels = plot.categories.clone();
    let x_formatter = |x: &f64| category_label(&labels, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(plot.categories.len() * 2 + 1)
        .x_label_formatter(&x_formatter)
        .y_labels(plot.axes.y_label_count(range))
        .x_desc(plot.axes.x_label.as_str())
        .y_desc(plot.axes.y_label.as_str())
        .draw()
        .map_err(|e| chart_err(&e))?;

    for entry in &plot.boxes {
        let Some(summary) = Summary::describe(&entry.values) else {
            continue;
        };
        let (lo, hi, outliers) = whiskers(&entry.values, &summary);
        let half = entry.width / 2.0;
        let (x0, x1, xc) = (entry.center - half, entry.center + half, entry.center);
        let cap = half / 2.0;

        chart
            .draw_series(iter::once(Rectangle::new(
                [(x0, summary.q1), (x1, summary.q3)],
                entry.color.filled(),
            )))
            .map_err(|e| chart_err(&e))?;
        chart
            .draw_series(iter::once(Rectangle::new(
                [(x0, summary.q1), (x1, summary.q3)],
                BLACK.stroke_width(1),
            )))
            .map_err(|e| chart_err(&e))?;

        let lines = [
            (vec![(x0, summary.median), (x1, summary.median)], 2),
            (vec![(xc, summary.q3), (xc, hi)], 1),
            (vec![(xc, summary.q1), (xc, lo)], 1),
            (vec![(xc - cap, hi), (xc + cap, hi)], 1),
            (vec![(xc - cap, lo), (xc + cap, lo)], 1),
        ];
        chart
            .draw_series(
                lines
                    .into_iter()
                    .map(|(points, width)| PathElement::new(points, BLACK.stroke_width(width))),
            )
            .map_err(|e| chart_err(&e))?;

        chart
            .draw_series(
                outliers
                    .into_iter()
                    .map(|v| Circle::new((xc, v), 3, BLACK.stroke_width(1))),
            )
            .map_err(|e| chart_err(&e))?;
    }

    if !plot.legend.is_empty() {
        for group in &plot.legend {
            let color = group_color(*group);
            chart
                .draw_series(iter::empty::<Rectangle<(f64, f64)>>())
                .map_err(|e| chart_err(&e))?
                .label(group.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(|e| chart_err(&e))?;
    }

    root.present().map_err(|e| chart_err(&e))?;
    Ok(())
}
