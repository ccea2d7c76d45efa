//! Number of manifest-declared components per app.

use crate::core::{App, Group, PerGroup, Result};
use crate::io::ComponentKind;
use crate::output::charts::{AxisStyle, BoxPlot};
use crate::output::report::{format_optional, format_test, TextReport, SECTION_RULE};
use crate::output::summary::Outputs;
use crate::stats::{self, StatsError, TestResult};

use super::{AnalysisContext, AnalysisKind};

pub const REPORT_FILE: &str = "components_stats.txt";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentStats {
    /// Activities + services + receivers + providers of each app.
    pub totals: PerGroup<Vec<f64>>,
    /// Per-category counts, in [`ComponentKind::ALL`] order.
    pub by_kind: Vec<(ComponentKind, PerGroup<Vec<f64>>)>,
}

pub fn collect_component_stats(apps: &[App]) -> ComponentStats {
    let with_manifest: Vec<&App> = apps.iter().filter(|a| a.manifest().is_some()).collect();

    ComponentStats {
        totals: PerGroup::collect(with_manifest.iter().copied(), |app| {
            app.manifest().map(|m| m.components.total() as f64)
        }),
        by_kind: ComponentKind::ALL
            .into_iter()
            .map(|kind| {
                let samples = PerGroup::collect(with_manifest.iter().copied(), |app| {
                    app.manifest().map(|m| m.components.get(kind) as f64)
                });
                (kind, samples)
            })
            .collect(),
    }
}

/// Sample size, mean and population variance of one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupFigures {
    pub len: usize,
    pub mean: Option<f64>,
    pub variance: Option<f64>,
}

impl GroupFigures {
    pub fn of(values: &[f64]) -> Self {
        Self {
            len: values.len(),
            mean: stats::mean(values).ok(),
            variance: stats::population_variance(values).ok(),
        }
    }
}

pub fn analyse_components(apps: &[App], ctx: &AnalysisContext) -> Result<Outputs> {
    let counts = collect_component_stats(apps);
    let figures = counts.totals.map(|_, v| GroupFigures::of(v));
    for (group, f) in figures.iter() {
        log::info!(
            "{} components: len={} mean={} var={}",
            group,
            f.len,
            format_optional(f.mean),
            format_optional(f.variance)
        );
    }

    let test = stats::mann_whitney_u(&counts.totals.covid, &counts.totals.non_covid);
    match &test {
        Ok(t) => log::info!("Component count Mann-Whitney U={} p={}", t.statistic, t.p_value),
        Err(e) => log::warn!("Component count test skipped: {e}"),
    }

    let mut outputs = Outputs::new(AnalysisKind::Components.title());
    ctx.box_plot(
        "component_count",
        &BoxPlot::by_group(&counts.totals, AxisStyle::new("", "Number of components")),
        &mut outputs,
    )?;

    let path = ctx.report_path(REPORT_FILE);
    let mut report = TextReport::create(&path)?;
    report.append(&render_report(&counts, &figures, &test))?;
    outputs.report = Some(path);
    Ok(outputs)
}

fn render_report(
    counts: &ComponentStats,
    figures: &PerGroup<GroupFigures>,
    test: &std::result::Result<TestResult, StatsError>,
) -> String {
    let mut out = String::new();
    for (group, f) in figures.iter() {
        out.push_str(&format!("{group} apps:\n"));
        out.push_str(&format!("\tLen: {}\n", f.len));
        out.push_str(&format!("\tMean: {}\n", format_optional(f.mean)));
        out.push_str(&format!("\tVar: {}\n", format_optional(f.variance)));
    }
    out.push_str(SECTION_RULE);

    out.push_str("Number of components:\n");
    out.push_str(&format!("mann-whitney U test p-value: {}\n", format_test(test)));
    out.push_str(SECTION_RULE);

    out.push_str("Median # of components per category:\n");
    for (kind, samples) in &counts.by_kind {
        let medians = samples.map(|_, v| format_optional(stats::median(v).ok()));
        out.push_str(&format!(
            "\t{}: {} {} / {} {}\n",
            kind.label(),
            Group::Covid,
            medians.covid,
            Group::NonCovid,
            medians.non_covid
        ));
    }
    out.push_str(SECTION_RULE);
    out
}
