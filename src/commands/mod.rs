//! CLI command implementations.
//!
//! - **analyze**: load a crawled study, compute statistics and render charts
//! - **init**: write a default `.appcompare.toml`

pub mod analyze;
pub mod init;

pub use analyze::{handle_analyze, run_analysis, AnalyzeConfig, RunSettings};
pub use init::init_config;
