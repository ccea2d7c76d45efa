//! The four aggregators run by `appcompare analyze`.
//!
//! Each aggregator reads the loaded apps, renders its charts into the
//! figures directory and writes one text report next to them. They share
//! nothing but the [`AnalysisContext`].

pub mod components;
pub mod permissions;
pub mod quality;
pub mod sdk;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::Result;
use crate::output::charts::{self, BarChart, BoxPlot, ChartOptions, GroupedBarChart};
use crate::output::summary::Outputs;

/// Selects which aggregators run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Sdk,
    Permissions,
    Components,
    Quality,
}

impl AnalysisKind {
    /// Run order.
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Sdk,
        AnalysisKind::Permissions,
        AnalysisKind::Components,
        AnalysisKind::Quality,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AnalysisKind::Sdk => "SDK levels",
            AnalysisKind::Permissions => "Permissions",
            AnalysisKind::Components => "Components",
            AnalysisKind::Quality => "Code quality",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnalysisKind::Sdk => "sdk",
            AnalysisKind::Permissions => "permissions",
            AnalysisKind::Components => "components",
            AnalysisKind::Quality => "quality",
        })
    }
}

/// Where aggregators write and how they draw.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisContext {
    /// Receives both the charts and the text reports.
    pub figures_dir: PathBuf,
    pub chart_options: ChartOptions,
    pub top_permissions: usize,
}

impl AnalysisContext {
    pub fn new(figures_dir: impl Into<PathBuf>) -> Self {
        Self {
            figures_dir: figures_dir.into(),
            chart_options: ChartOptions::default(),
            top_permissions: 10,
        }
    }

    pub fn with_chart_options(mut self, options: ChartOptions) -> Self {
        self.chart_options = options;
        self
    }

    pub fn with_top_permissions(mut self, top: usize) -> Self {
        self.top_permissions = top;
        self
    }

    pub fn figure_path(&self, name: &str) -> PathBuf {
        self.figures_dir.join(format!("{name}.svg"))
    }

    pub fn report_path(&self, file: &str) -> PathBuf {
        self.figures_dir.join(file)
    }

    /// Render a box plot named `name` and record it in `outputs`.
    pub(crate) fn box_plot(&self, name: &str, plot: &BoxPlot, outputs: &mut Outputs) -> Result<()> {
        self.draw(name, outputs, |path, options| charts::render_box_plot(path, plot, options))
    }

    pub(crate) fn bar_chart(&self, name: &str, chart: &BarChart, outputs: &mut Outputs) -> Result<()> {
        // Long permission lists get taller images so every label fits.
        let rows = chart.entries.len() as u32;
        let options = self
            .chart_options
            .with_size(self.chart_options.width, self.chart_options.height.max(rows * 18 + 120));
        let path = self.figure_path(name);
        charts::render_bar_chart(&path, chart, &options)?;
        log::debug!("Wrote {}", path.display());
        outputs.figures.push(path);
        Ok(())
    }

    pub(crate) fn grouped_bar_chart(
        &self,
        name: &str,
        chart: &GroupedBarChart,
        outputs: &mut Outputs,
    ) -> Result<()> {
        self.draw(name, outputs, |path, options| {
            charts::render_grouped_bar_chart(path, chart, options)
        })
    }

    fn draw<F>(&self, name: &str, outputs: &mut Outputs, render: F) -> Result<()>
    where
        F: FnOnce(&Path, &ChartOptions) -> Result<()>,
    {
        let path = self.figure_path(name);
        render(&path, &self.chart_options)?;
        log::debug!("Wrote {}", path.display());
        outputs.figures.push(path);
        Ok(())
    }
}
