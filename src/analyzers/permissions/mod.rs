//! Permissions requested by each app, compared across the two groups.
//!
//! Per-app state is folded into a [`PermissionAccumulator`] first; charts
//! and `permissions_stats.txt` are produced from the finished accumulator.
//! Frequency tables count list entries by short name, so two identifiers
//! sharing a short name count twice. Protection-level counts see each
//! short name once per app.

pub mod frequency;
pub mod protection;

pub use frequency::{align, aligned_vectors, percentages, FrequencyTable};
pub use protection::{base_level, level_order, short_name, PermissionTable, UNDEFINED};

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{App, Group, PerGroup, Result};
use crate::output::charts::{AxisStyle, BarChart, BoxPlot, ChartOptions, GroupedBarChart};
use crate::output::report::{format_optional, format_percent, format_test, TextReport, SECTION_RULE};
use crate::output::summary::Outputs;
use crate::stats::{self, StatsError, TestResult};

use super::{AnalysisContext, AnalysisKind};

pub const REPORT_FILE: &str = "permissions_stats.txt";

/// Permission counts of one app per protection level.
pub type LevelCounts = BTreeMap<String, u64>;

/// Everything gathered from the apps before any statistic is computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionAccumulator {
    /// Raw length of each app's permission list.
    pub counts: PerGroup<Vec<f64>>,
    /// Short name to number of list entries carrying it.
    pub frequencies: PerGroup<FrequencyTable>,
    pub levels: PerGroup<Vec<LevelCounts>>,
}

impl PermissionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_app(&mut self, group: Group, permissions: &[String], table: &PermissionTable) {
        self.counts.get_mut(group).push(permissions.len() as f64);

        let mut seen = BTreeSet::new();
        let mut levels = LevelCounts::new();
        for permission in permissions {
            let name = short_name(permission);
            self.frequencies.get_mut(group).increment(name);
            if !seen.insert(name) {
                continue;
            }
            *levels.entry(table.level_of(permission).to_string()).or_insert(0) += 1;
        }
        self.levels.get_mut(group).push(levels);
    }

    /// Apps with permission data in `group`.
    pub fn app_count(&self, group: Group) -> usize {
        self.counts.get(group).len()
    }

    /// Every protection level seen in either group, `undefined` last.
    pub fn level_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .levels
            .iter()
            .flat_map(|(_, apps)| apps.iter().flat_map(|l| l.keys().cloned()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        names.sort_by(|a, b| level_order(a, b));
        names
    }

    /// Per-app permission count at `level`, zero for apps without one.
    pub fn level_samples(&self, level: &str) -> PerGroup<Vec<f64>> {
        self.levels.map(|_, apps| {
            apps.iter()
                .map(|l| l.get(level).copied().unwrap_or(0) as f64)
                .collect()
        })
    }

    /// Percentage of apps holding at least one permission at `level`.
    pub fn level_share(&self, level: &str) -> PerGroup<f64> {
        self.levels.map(|_, apps| {
            if apps.is_empty() {
                return 0.0;
            }
            let holding = apps.iter().filter(|l| l.get(level).is_some_and(|c| *c > 0)).count();
            holding as f64 * 100.0 / apps.len() as f64
        })
    }

    /// Signed-rank test over the key-aligned frequency vectors.
    pub fn frequency_test(&self) -> std::result::Result<TestResult, StatsError> {
        let (covid, non_covid) = aligned_vectors(&self.frequencies.covid, &self.frequencies.non_covid);
        stats::wilcoxon_signed_rank(&covid, &non_covid)
    }
}

pub fn collect_permissions(apps: &[App], table: &PermissionTable) -> PermissionAccumulator {
    let mut acc = PermissionAccumulator::new();
    for app in apps {
        if let Some(permissions) = app.permissions() {
            acc.add_app(app.group, permissions, table);
        }
    }
    acc
}

pub fn analyse_permissions(
    apps: &[App],
    table: &PermissionTable,
    ctx: &AnalysisContext,
) -> Result<Outputs> {
    let acc = collect_permissions(apps, table);
    for group in Group::ALL {
        log::info!(
            "{}: {} apps with permission data, {} distinct permissions",
            group,
            acc.app_count(group),
            acc.frequencies.get(group).len()
        );
    }

    let test = acc.frequency_test();
    if let Err(e) = &test {
        log::warn!("Permission frequency test skipped: {e}");
    }

    let mut outputs = Outputs::new(AnalysisKind::Permissions.title());
    render_charts(&acc, ctx, &mut outputs)?;

    let path = ctx.report_path(REPORT_FILE);
    let mut report = TextReport::create(&path)?;
    report.append(&render_report(&acc, &test))?;
    outputs.report = Some(path);
    Ok(outputs)
}

fn render_charts(acc: &PermissionAccumulator, ctx: &AnalysisContext, outputs: &mut Outputs) -> Result<()> {
    let max_count = acc
        .counts
        .iter()
        .flat_map(|(_, v)| v.iter().copied())
        .fold(0.0, f64::max);
    let mut axes = AxisStyle::new("Apps", "# of permissions").with_y_step(1.0);
    if max_count > 0.0 {
        axes = axes.with_y_range(0.0, max_count);
    }
    ctx.clone()
        .with_chart_options(ChartOptions::default().with_size(600, 800))
        .box_plot("num_permissions", &BoxPlot::by_group(&acc.counts, axes), outputs)?;

    for group in Group::ALL {
        let table = acc.frequencies.get(group);
        let total = acc.app_count(group);
        for (suffix, entries) in [
            ("", table.top(ctx.top_permissions)),
            ("all_", table.sorted_by_frequency()),
        ] {
            let name = format!("permissions_frequencies_{suffix}{}", group.slug());
            let raw = entries.iter().map(|(k, v)| (k.to_string(), *v as f64)).collect();
            ctx.bar_chart(
                &name,
                &BarChart::new(raw, AxisStyle::new("Permission", "Frequency")),
                outputs,
            )?;
            ctx.bar_chart(
                &format!("{name}_pct"),
                &BarChart::new(
                    percentages(&entries, total),
                    AxisStyle::new("Permission", "% of apps").with_y_range(0.0, 100.0),
                ),
                outputs,
            )?;
        }
    }

    let levels = acc.level_names();
    let samples: Vec<(String, PerGroup<Vec<f64>>)> = levels
        .iter()
        .map(|level| (level.clone(), acc.level_samples(level)))
        .collect();
    ctx.box_plot(
        "protection_levels",
        &BoxPlot::by_category(&samples, AxisStyle::new("Protection level", "# of permissions")),
        outputs,
    )?;

    let shares: Vec<PerGroup<f64>> = levels.iter().map(|l| acc.level_share(l)).collect();
    ctx.grouped_bar_chart(
        "protection_levels_pct",
        &GroupedBarChart {
            categories: levels.clone(),
            values: PerGroup::new(
                shares.iter().map(|s| s.covid).collect(),
                shares.iter().map(|s| s.non_covid).collect(),
            ),
            axes: AxisStyle::new("Protection level", "% of apps").with_y_range(0.0, 100.0),
        },
        outputs,
    )
}

fn render_report(
    acc: &PermissionAccumulator,
    test: &std::result::Result<TestResult, StatsError>,
) -> String {
    let mut out = String::from("Median # of permissions:\n");
    for (group, counts) in acc.counts.iter() {
        out.push_str(&format!(
            "{}: {}\n",
            group,
            format_optional(stats::median(counts).ok())
        ));
    }
    out.push_str(SECTION_RULE);

    for (i, (group, other)) in [(Group::Covid, Group::NonCovid), (Group::NonCovid, Group::Covid)]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("Permissions only in {group}:\n"));
        for (name, count) in acc.frequencies.get(group).keys_not_in(acc.frequencies.get(other)) {
            out.push_str(&format!("\t{name}: {count}\n"));
        }
    }
    out.push_str(SECTION_RULE);

    out.push_str("Permission frequencies:\n");
    out.push_str(&format!("wilcoxon signed-rank test p-value: {}\n", format_test(test)));
    out.push_str(SECTION_RULE);

    let levels = acc.level_names();
    out.push_str("Apps with at least one permission per protection level:\n");
    for level in &levels {
        let share = acc.level_share(level);
        out.push_str(&format!(
            "\t{level}: {} {} / {} {}\n",
            Group::Covid,
            format_percent(share.covid),
            Group::NonCovid,
            format_percent(share.non_covid)
        ));
    }
    out.push_str(SECTION_RULE);

    out.push_str("Median # of permissions per protection level:\n");
    for level in &levels {
        let medians = acc
            .level_samples(level)
            .map(|_, v| format_optional(stats::median(v).ok()));
        out.push_str(&format!(
            "\t{level}: {} {} / {} {}\n",
            Group::Covid,
            medians.covid,
            Group::NonCovid,
            medians.non_covid
        ));
    }
    out.push_str(SECTION_RULE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn perms(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| format!("android.permission.{n}")).collect()
    }

    fn table() -> PermissionTable {
        PermissionTable::from_levels([
            ("android.permission.CAMERA", "dangerous"),
            ("android.permission.INTERNET", "normal"),
        ])
    }

    fn sample() -> PermissionAccumulator {
        let table = table();
        let mut acc = PermissionAccumulator::new();
        acc.add_app(Group::Covid, &perms(&["CAMERA"]), &table);
        acc.add_app(Group::NonCovid, &perms(&["CAMERA", "INTERNET"]), &table);
        acc
    }

    #[test]
    fn test_frequencies_per_group() {
        let acc = sample();
        assert_eq!(acc.frequencies.covid.iter().collect::<Vec<_>>(), vec![("CAMERA", 1)]);
        assert_eq!(
            acc.frequencies.non_covid.iter().collect::<Vec<_>>(),
            vec![("CAMERA", 1), ("INTERNET", 1)]
        );
        assert_eq!(acc.counts, PerGroup::new(vec![1.0], vec![2.0]));
    }

    #[test]
    fn test_frequency_test_runs_on_aligned_vectors() {
        let result = sample().frequency_test().unwrap();
        assert!(result.p_value > 0.0 && result.p_value <= 1.0);
    }

    #[test]
    fn test_every_list_entry_counts_towards_frequency() {
        let mut acc = PermissionAccumulator::new();
        let list = vec![
            "android.permission.RECEIVE".to_string(),
            "com.google.android.c2dm.permission.RECEIVE".to_string(),
        ];
        acc.add_app(Group::Covid, &list, &table());

        assert_eq!(acc.frequencies.covid.get("RECEIVE"), 2);
        assert_eq!(acc.levels.covid[0].get("undefined"), Some(&1));
    }

    #[test]
    fn test_duplicate_short_names_share_one_level_count() {
        let mut acc = PermissionAccumulator::new();
        let list = vec![
            "android.permission.CAMERA".to_string(),
            "com.vendor.permission.CAMERA".to_string(),
            "android.permission.CAMERA".to_string(),
        ];
        acc.add_app(Group::Covid, &list, &table());

        assert_eq!(acc.frequencies.covid.get("CAMERA"), 3);
        assert_eq!(acc.counts.covid, vec![3.0]);
        assert_eq!(acc.levels.covid[0].get("dangerous"), Some(&1));
    }

    #[test]
    fn test_levels_are_zero_filled() {
        let mut acc = sample();
        acc.add_app(Group::Covid, &perms(&["C2D_MESSAGE"]), &table());

        assert_eq!(acc.level_names(), vec!["dangerous", "normal", "undefined"]);
        assert_eq!(
            acc.level_samples("normal"),
            PerGroup::new(vec![0.0, 0.0], vec![1.0])
        );
        assert_eq!(acc.level_share("dangerous"), PerGroup::new(50.0, 100.0));
    }

    #[test]
    fn test_report_sections() {
        let acc = sample();
        let text = render_report(&acc, &acc.frequency_test());

        assert!(text.starts_with("Median # of permissions:\nCOVID: 1\nnon-COVID: 2\n"));
        assert!(text.contains("Permissions only in COVID:\n\nPermissions only in non-COVID:\n\tINTERNET: 1\n"));
        assert!(text.contains("wilcoxon signed-rank test p-value: 1\n"));
        assert!(text.contains("\tdangerous: COVID 100.00% / non-COVID 100.00%\n"));
        assert!(text.contains("\tnormal: COVID 0 / non-COVID 1\n"));
    }

    #[test]
    fn test_report_records_failed_test() {
        let acc = PermissionAccumulator::new();
        let text = render_report(&acc, &acc.frequency_test());
        assert!(text.contains("COVID: n/a\n"));
        assert!(text.contains("p-value: n/a ("));
    }
}
