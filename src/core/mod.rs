pub mod app;
pub mod errors;
pub mod group;

pub use app::{AndroguardReport, App, AppEntry, AppList, AppMetadata, Artifacts, Review};
pub use errors::{Error, Result, ResultExt};
pub use group::{Group, Grouped, PerGroup};
