//! Everything the pipeline writes: SVG charts, plain-text reports and the
//! console summary.

pub mod charts;
pub mod report;
pub mod summary;

pub use report::{format_optional, format_percent, format_test, TextReport, SECTION_RULE};
pub use summary::{describe_table, format_outputs, Outputs};
