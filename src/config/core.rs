use serde::{Deserialize, Serialize};

use crate::output::charts::ChartOptions;

/// Root of `.appcompare.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppcompareConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub analysis: AnalysisSettings,

    #[serde(default)]
    pub charts: ChartsConfig,
}

impl AppcompareConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.analysis.separator.is_empty() {
            return Err("analysis.separator must not be empty".to_string());
        }
        if self.analysis.top_permissions == 0 {
            return Err("analysis.top_permissions must be at least 1".to_string());
        }
        if self.charts.width == 0 || self.charts.height == 0 {
            return Err("charts.width and charts.height must be positive".to_string());
        }
        Ok(())
    }
}

/// Input and output locations, relative to the analysed root unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub apps_file: String,
    pub data_dir: String,
    pub figures_dir: String,
    pub permissions_table: String,
    pub quality_csv: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            apps_file: "apps.json".to_string(),
            data_dir: "data".to_string(),
            figures_dir: "figures".to_string(),
            permissions_table: "code/static_resources/android_permissions.json".to_string(),
            quality_csv: "data/sonarqube_data.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSettings {
    /// Joins app id, version and artifact kind in file names
    pub separator: String,
    /// Bars in the top-N permission charts
    pub top_permissions: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            separator: "___".to_string(),
            top_permissions: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartsConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        let options = ChartOptions::default();
        Self {
            width: options.width,
            height: options.height,
        }
    }
}

impl From<ChartsConfig> for ChartOptions {
    fn from(config: ChartsConfig) -> Self {
        ChartOptions::default().with_size(config.width, config.height)
    }
}
