//! Plain-text statistics reports.
//!
//! A report is truncated when created and then appended to section by
//! section, so a re-run over the same inputs reproduces it byte for byte.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::{Error, Result};
use crate::stats::{StatsError, TestResult};

pub const SECTION_RULE: &str = "-------------------------------------\n";

#[derive(Debug)]
pub struct TextReport {
    path: PathBuf,
    file: File,
}

impl TextReport {
    /// Create (or truncate) the report file.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| Error::io_at(&path, e))?;
        Ok(Self { path, file })
    }

    pub fn append(&mut self, text: &str) -> Result<()> {
        self.file
            .write_all(text.as_bytes())
            .map_err(|e| Error::io_at(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

pub fn format_test(result: &std::result::Result<TestResult, StatsError>) -> String {
    match result {
        Ok(r) => r.p_value.to_string(),
        Err(e) => format!("n/a ({e})"),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}
