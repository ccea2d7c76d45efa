//! Console tables printed at the end of a run.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;

use crate::core::PerGroup;
use crate::formatting::Styler;
use crate::stats::Summary;

const DESCRIBE_HEADER: [&str; 10] = [
    "metric", "group", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Count, mean, spread and quartiles of every column, one row per group.
pub fn describe_table(columns: &[(&str, &PerGroup<Vec<f64>>)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(DESCRIBE_HEADER);

    for (name, samples) in columns {
        for (group, values) in samples.iter() {
            let mut row = vec![name.to_string(), group.to_string()];
            match Summary::describe(values) {
                Some(s) => row.extend([
                    s.count.to_string(),
                    fmt_cell(s.mean),
                    s.std.map_or_else(|| "-".to_string(), fmt_cell),
                    fmt_cell(s.min),
                    fmt_cell(s.q1),
                    fmt_cell(s.median),
                    fmt_cell(s.q3),
                    fmt_cell(s.max),
                ]),
                None => {
                    row.push("0".to_string());
                    row.extend(std::iter::repeat_n("-".to_string(), 7));
                }
            }
            table.add_row(row);
        }
    }
    table
}

fn fmt_cell(value: f64) -> String {
    format!("{value:.2}")
}

/// Everything one analysis wrote to disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs {
    pub name: String,
    pub report: Option<PathBuf>,
    pub figures: Vec<PathBuf>,
    /// Rendered table printed after the file list.
    pub summary: Option<String>,
}

impl Outputs {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Lines listing the files each analysis produced.
pub fn format_outputs(styler: &Styler, outputs: &[Outputs]) -> String {
    let mut out = String::new();
    for entry in outputs {
        out.push_str(&styler.header(&entry.name));
        out.push('\n');
        if let Some(report) = &entry.report {
            out.push_str(&format!("  report  {}\n", report.display()));
        }
        for figure in &entry.figures {
            out.push_str(&format!("  {}  {}\n", styler.dim("figure"), figure.display()));
        }
        if let Some(table) = &entry.summary {
            out.push_str(table);
            out.push('\n');
        }
    }
    out
}
