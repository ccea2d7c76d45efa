//! SonarQube metrics joined onto the apps by APK name.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::{App, Error, Group, Grouped, PerGroup, Result};
use crate::output::charts::{AxisStyle, BoxPlot};
use crate::output::report::{format_optional, format_test, TextReport, SECTION_RULE};
use crate::output::summary::{describe_table, Outputs};
use crate::stats::{self, StatsError, TestResult};

use super::{AnalysisContext, AnalysisKind};

pub const REPORT_FILE: &str = "quality_stats.txt";

#[derive(Debug, Clone, Deserialize)]
struct QualityRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Bugs", default)]
    bugs: String,
    #[serde(rename = "Vulnerabilities", default)]
    vulnerabilities: String,
    #[serde(rename = "Code Smells", default)]
    smells: String,
    #[serde(rename = "Duplication", default)]
    duplication: String,
    #[serde(rename = "#LOC", default)]
    locs: String,
}

/// `"-"` and empty cells are missing; a trailing `%` is ignored.
pub fn make_numeric(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "-" {
        return None;
    }
    let number = cell.strip_suffix('%').unwrap_or(cell).trim();
    match number.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::debug!("Ignoring non-numeric quality cell {cell:?}");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QualityMetrics {
    pub bugs: Option<f64>,
    pub vulnerabilities: Option<f64>,
    pub smells: Option<f64>,
    pub duplication: Option<f64>,
    pub locs: Option<f64>,
}

impl From<&QualityRow> for QualityMetrics {
    fn from(row: &QualityRow) -> Self {
        Self {
            bugs: make_numeric(&row.bugs),
            vulnerabilities: make_numeric(&row.vulnerabilities),
            smells: make_numeric(&row.smells),
            duplication: make_numeric(&row.duplication),
            locs: make_numeric(&row.locs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityMetric {
    Bugs,
    Vulnerabilities,
    Smells,
    Duplication,
    Locs,
}

impl QualityMetric {
    pub const ALL: [QualityMetric; 5] = [
        QualityMetric::Bugs,
        QualityMetric::Vulnerabilities,
        QualityMetric::Smells,
        QualityMetric::Duplication,
        QualityMetric::Locs,
    ];

    /// Column and figure name.
    pub fn name(self) -> &'static str {
        match self {
            QualityMetric::Bugs => "bugs",
            QualityMetric::Vulnerabilities => "vulnerabilities",
            QualityMetric::Smells => "smells",
            QualityMetric::Duplication => "duplication",
            QualityMetric::Locs => "locs",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            QualityMetric::Bugs => "Number of bugs",
            QualityMetric::Vulnerabilities => "Number of vulnerabilities",
            QualityMetric::Smells => "Number of code smells",
            QualityMetric::Duplication => "Level of code duplication",
            QualityMetric::Locs => "Number of lines of code",
        }
    }

    pub fn value(self, metrics: &QualityMetrics) -> Option<f64> {
        match self {
            QualityMetric::Bugs => metrics.bugs,
            QualityMetric::Vulnerabilities => metrics.vulnerabilities,
            QualityMetric::Smells => metrics.smells,
            QualityMetric::Duplication => metrics.duplication,
            QualityMetric::Locs => metrics.locs,
        }
    }
}

/// Rows of `sonarqube_data.csv` keyed by APK file name.
#[derive(Debug, Clone, Default)]
pub struct QualityTable {
    rows: HashMap<String, QualityMetrics>,
    separator: String,
}

impl QualityTable {
    pub fn load(path: &Path, separator: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| Error::csv(path, e))?;
        let mut rows = HashMap::new();
        for record in reader.deserialize::<QualityRow>() {
            let row = record.map_err(|e| Error::csv(path, e))?;
            // First row for an APK wins.
            rows.entry(row.name.clone())
                .or_insert_with(|| QualityMetrics::from(&row));
        }
        log::debug!("Loaded {} quality rows from {}", rows.len(), path.display());
        Ok(Self {
            rows,
            separator: separator.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `<id><SEP><version>.apk`
    pub fn apk_name(&self, app: &App) -> String {
        format!("{}{}{}.apk", app.id, self.separator, app.version)
    }

    pub fn lookup(&self, app: &App) -> Option<&QualityMetrics> {
        self.rows.get(&self.apk_name(app))
    }
}

/// Metrics of one app, all `None` when the CSV has no row for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppQuality {
    pub group: Group,
    pub metrics: QualityMetrics,
}

impl Grouped for AppQuality {
    fn group(&self) -> Group {
        self.group
    }
}

pub fn join_quality(apps: &[App], table: &QualityTable) -> Vec<AppQuality> {
    apps.iter()
        .map(|app| {
            let metrics = table.lookup(app).copied().unwrap_or_else(|| {
                log::warn!("No quality data for {}", table.apk_name(app));
                QualityMetrics::default()
            });
            AppQuality {
                group: app.group,
                metrics,
            }
        })
        .collect()
}

/// Non-missing values of `metric` split by group.
pub fn metric_samples(rows: &[AppQuality], metric: QualityMetric) -> PerGroup<Vec<f64>> {
    PerGroup::collect(rows, |row| metric.value(&row.metrics))
}

pub fn analyse_quality(apps: &[App], table: &QualityTable, ctx: &AnalysisContext) -> Result<Outputs> {
    let rows = join_quality(apps, table);
    let mut outputs = Outputs::new(AnalysisKind::Quality.title());

    let samples: Vec<(QualityMetric, PerGroup<Vec<f64>>)> = QualityMetric::ALL
        .into_iter()
        .map(|metric| (metric, metric_samples(&rows, metric)))
        .collect();

    let mut tests = Vec::with_capacity(samples.len());
    for (metric, values) in &samples {
        ctx.box_plot(
            metric.name(),
            &BoxPlot::by_group(values, AxisStyle::new("", metric.axis_label())),
            &mut outputs,
        )?;

        let test = stats::mann_whitney_u(&values.covid, &values.non_covid);
        match &test {
            Ok(t) => log::info!(
                "P-value for the Mann-Whitney stat on variable {}: {}",
                metric.name(),
                t.p_value
            ),
            Err(e) => log::warn!("Mann-Whitney test on {} skipped: {e}", metric.name()),
        }
        tests.push(test);
    }

    let path = ctx.report_path(REPORT_FILE);
    let mut report = TextReport::create(&path)?;
    report.append(&render_report(&samples, &tests))?;
    outputs.report = Some(path);

    let columns: Vec<(&str, &PerGroup<Vec<f64>>)> =
        samples.iter().map(|(m, v)| (m.name(), v)).collect();
    outputs.summary = Some(describe_table(&columns).to_string());
    Ok(outputs)
}

fn render_report(
    samples: &[(QualityMetric, PerGroup<Vec<f64>>)],
    tests: &[std::result::Result<TestResult, StatsError>],
) -> String {
    let mut out = String::new();
    for ((metric, values), test) in samples.iter().zip(tests) {
        out.push_str(&format!("{}:\n", metric.name()));
        for (group, v) in values.iter() {
            out.push_str(&format!(
                "\t{}: n={} median={}\n",
                group,
                v.len(),
                format_optional(stats::median(v).ok())
            ));
        }
        out.push_str(&format!("mann-whitney U test p-value: {}\n", format_test(test)));
        out.push_str(SECTION_RULE);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Artifacts;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    fn app(id: &str, group: Group) -> App {
        App {
            id: id.to_string(),
            version: "1.0".to_string(),
            group,
            artifacts: Artifacts::default(),
        }
    }

    fn write_csv(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("sonarqube_data.csv");
        fs::write(
            &path,
            indoc! {r#"
                Name,Bugs,Vulnerabilities,Code Smells,Duplication,#LOC
                a___1.0.apk,3,0,120,4.5%,15000
                b___1.0.apk,-,1,80,,9000
            "#},
        )
        .unwrap();
        path
    }

    #[test]
    fn test_make_numeric() {
        assert_eq!(make_numeric("-"), None);
        assert_eq!(make_numeric(""), None);
        assert_eq!(make_numeric("3.5"), Some(3.5));
        assert_eq!(make_numeric("12.0%"), Some(12.0));
        assert_eq!(make_numeric("n/a"), None);
    }

    #[test]
    fn test_load_and_lookup() {
        let dir = TempDir::new().unwrap();
        let table = QualityTable::load(&write_csv(&dir), "___").unwrap();
        assert_eq!(table.len(), 2);

        let a = table.lookup(&app("a", Group::Covid)).unwrap();
        assert_eq!(a.bugs, Some(3.0));
        assert_eq!(a.duplication, Some(4.5));

        let b = table.lookup(&app("b", Group::NonCovid)).unwrap();
        assert_eq!(b.bugs, None);
        assert_eq!(b.duplication, None);
    }

    #[test]
    fn test_first_duplicate_row_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sonarqube_data.csv");
        fs::write(
            &path,
            indoc! {r#"
                Name,Bugs,Vulnerabilities,Code Smells,Duplication,#LOC
                a___1.0.apk,3,0,120,4.5%,15000
                a___1.0.apk,9,9,999,9.0%,99999
            "#},
        )
        .unwrap();

        let table = QualityTable::load(&path, "___").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(&app("a", Group::Covid)).unwrap().bugs, Some(3.0));
    }

    #[test]
    fn test_missing_row_is_all_none() {
        let dir = TempDir::new().unwrap();
        let table = QualityTable::load(&write_csv(&dir), "___").unwrap();
        let rows = join_quality(&[app("a", Group::Covid), app("zzz", Group::NonCovid)], &table);

        assert_eq!(rows[1].metrics, QualityMetrics::default());
        let bugs = metric_samples(&rows, QualityMetric::Bugs);
        assert_eq!(bugs, PerGroup::new(vec![3.0], vec![]));
    }

    #[test]
    fn test_report_records_each_metric() {
        let rows = vec![
            AppQuality {
                group: Group::Covid,
                metrics: QualityMetrics {
                    locs: Some(100.0),
                    ..Default::default()
                },
            },
            AppQuality {
                group: Group::NonCovid,
                metrics: QualityMetrics {
                    locs: Some(300.0),
                    ..Default::default()
                },
            },
        ];
        let samples: Vec<_> = QualityMetric::ALL
            .into_iter()
            .map(|m| (m, metric_samples(&rows, m)))
            .collect();
        let tests: Vec<_> = samples
            .iter()
            .map(|(_, v)| stats::mann_whitney_u(&v.covid, &v.non_covid))
            .collect();
        let text = render_report(&samples, &tests);

        assert!(text.starts_with("bugs:\n\tCOVID: n=0 median=n/a\n"));
        assert!(text.contains("locs:\n\tCOVID: n=1 median=100\n\tnon-COVID: n=1 median=300\n"));
        assert!(text.contains("mann-whitney U test p-value: n/a (sample is empty)\n"));
    }

    #[test]
    fn test_csv_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let err = QualityTable::load(&dir.path().join("missing.csv"), "___").unwrap_err();
        assert!(err.to_string().contains("missing.csv"));
    }
}
