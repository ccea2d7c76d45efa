//! SDK levels declared in the manifest.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::core::{App, Group, PerGroup, Result};
use crate::output::charts::{AxisStyle, BoxPlot};
use crate::output::report::{format_optional, TextReport, SECTION_RULE};
use crate::output::summary::Outputs;
use crate::stats;

use super::{AnalysisContext, AnalysisKind};

static DECLARED_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Declared target SDK:\s*(\d+)").expect("valid regex"));
static EFFECTIVE_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Effective target SDK:\s*(\d+)").expect("valid regex"));
static MIN_SDK: Lazy<Regex> = Lazy::new(|| Regex::new(r"Min SDK:\s*(\d+)").expect("valid regex"));
static MAX_SDK: Lazy<Regex> = Lazy::new(|| Regex::new(r"Max SDK:\s*(\d+)").expect("valid regex"));

pub const REPORT_FILE: &str = "sdk_stats.txt";

/// SDK levels as found in the androwarn text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SdkInfo {
    pub target_sdk: Option<u32>,
    pub effective_sdk: Option<u32>,
    pub min_sdk: Option<u32>,
    pub max_sdk: Option<u32>,
}

impl SdkInfo {
    /// Declared target SDK, or the effective one when none is declared.
    pub fn reported_target(&self) -> Option<u32> {
        self.target_sdk.or(self.effective_sdk)
    }
}

pub fn extract_sdk_info<S: AsRef<str>>(lines: &[S]) -> SdkInfo {
    let contents = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");

    SdkInfo {
        target_sdk: first_number(&DECLARED_TARGET, &contents),
        effective_sdk: first_number(&EFFECTIVE_TARGET, &contents),
        min_sdk: first_number(&MIN_SDK, &contents),
        max_sdk: first_number(&MAX_SDK, &contents),
    }
}

fn first_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Per-app SDK levels split by group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SdkStats {
    pub min_sdk: PerGroup<Vec<f64>>,
    pub target_sdk: PerGroup<Vec<f64>>,
    pub max_sdk: PerGroup<Vec<f64>>,
}

pub fn collect_sdk_stats(apps: &[App]) -> SdkStats {
    let infos: Vec<(&App, SdkInfo)> = apps
        .iter()
        .filter_map(|app| app.manifest().map(|m| (app, extract_sdk_info(&m.sdk_lines))))
        .collect();

    let column = |f: fn(&SdkInfo) -> Option<u32>| {
        infos.iter().fold(PerGroup::<Vec<f64>>::default(), |mut acc, (app, info)| {
            if let Some(v) = f(info) {
                acc.get_mut(app.group).push(f64::from(v));
            }
            acc
        })
    };

    SdkStats {
        min_sdk: column(|i| i.min_sdk),
        target_sdk: column(SdkInfo::reported_target),
        max_sdk: column(|i| i.max_sdk),
    }
}

pub fn analyse_sdks(apps: &[App], ctx: &AnalysisContext) -> Result<Outputs> {
    let levels = collect_sdk_stats(apps);
    for (group, values) in levels.target_sdk.iter() {
        log::info!("{}: {} apps with a target SDK", group, values.len());
    }

    let mut outputs = Outputs::new(AnalysisKind::Sdk.title());
    let axes = AxisStyle::new("", "API level")
        .with_y_range(0.0, 30.0)
        .with_y_step(1.0);
    ctx.box_plot(
        "min_sdk",
        &BoxPlot::by_group(&levels.min_sdk, axes.clone().with_y_label("Min SDK")),
        &mut outputs,
    )?;
    ctx.box_plot(
        "target_sdk",
        &BoxPlot::by_group(&levels.target_sdk, axes.with_y_label("Target SDK")),
        &mut outputs,
    )?;

    let path = ctx.report_path(REPORT_FILE);
    let mut report = TextReport::create(&path)?;
    report.append(&render_report(&levels))?;
    outputs.report = Some(path);
    Ok(outputs)
}

fn render_report(levels: &SdkStats) -> String {
    let mut out = String::new();
    for (title, column) in [
        ("Min SDK", &levels.min_sdk),
        ("Target SDK", &levels.target_sdk),
        ("Max SDK", &levels.max_sdk),
    ] {
        out.push_str(&format!("{title}:\n"));
        for group in Group::ALL {
            let values = column.get(group);
            out.push_str(&format!(
                "\t{}: n={} median={}\n",
                group,
                values.len(),
                format_optional(stats::median(values).ok())
            ));
        }
        out.push_str(SECTION_RULE);
    }
    out
}
