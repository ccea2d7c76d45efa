//! Comparative statistics for crawled COVID and non-COVID Android apps.
//!
//! The crate loads per-app artifacts produced by a crawler (metadata,
//! androwarn reports, permission lists, quality metrics), splits apps into
//! the two groups and writes text reports plus SVG charts comparing them.

pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod output;
pub mod progress;
pub mod stats;

pub use crate::core::{App, AppList, Artifacts, Error, Group, PerGroup, Result};

pub use crate::analyzers::{AnalysisContext, AnalysisKind};
pub use crate::analyzers::permissions::PermissionTable;
pub use crate::analyzers::quality::QualityTable;

pub use crate::config::{load_config, AppcompareConfig};
pub use crate::output::summary::Outputs;
