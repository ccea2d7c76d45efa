//! `.appcompare.toml` handling.
//!
//! The file is optional. Without it every setting takes its default, and
//! relative paths are resolved against the analysed root directory.

mod core;
mod loader;

pub use self::core::{AnalysisSettings, AppcompareConfig, ChartsConfig, PathsConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config, CONFIG_FILE,
};

use std::path::{Path, PathBuf};

/// Config paths made absolute against the analysed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub root: PathBuf,
    pub apps_file: PathBuf,
    pub data_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub permissions_table: PathBuf,
    pub quality_csv: PathBuf,
}

impl PathsConfig {
    pub fn resolve(&self, root: &Path) -> ResolvedPaths {
        let join = |p: &str| {
            let path = Path::new(p);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            }
        };
        ResolvedPaths {
            root: root.to_path_buf(),
            apps_file: join(&self.apps_file),
            data_dir: join(&self.data_dir),
            figures_dir: join(&self.figures_dir),
            permissions_table: join(&self.permissions_table),
            quality_csv: join(&self.quality_csv),
        }
    }
}

/// Contents written by `appcompare init`.
pub fn default_config_toml() -> String {
    let config = AppcompareConfig::default();
    let body = toml::to_string_pretty(&config).unwrap_or_default();
    format!("# appcompare configuration\n# Relative paths are resolved against the analysed root.\n\n{body}")
}
