use std::fs;
use std::path::{Path, PathBuf};

use super::core::AppcompareConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE: &str = ".appcompare.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

pub fn parse_and_validate_config(contents: &str) -> std::result::Result<AppcompareConfig, String> {
    let config = toml::from_str::<AppcompareConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE}: {e}"))?;
    config.validate()?;
    Ok(config)
}

/// Load a discovered config file; problems are logged and yield `None`.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<AppcompareConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Absent files are the normal case while searching ancestors.
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} ({}). Using defaults.", e, config_path.display());
            None
        }
    }
}

/// Load an explicitly requested config file; any problem is an error.
pub fn load_config_from(config_path: &Path) -> Result<AppcompareConfig> {
    let contents =
        fs::read_to_string(config_path).map_err(|e| Error::io_at(config_path, e))?;
    parse_and_validate_config(&contents)
        .map_err(|e| Error::Configuration(format!("{e} ({})", config_path.display())))
}

pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `root` and its ancestors for `.appcompare.toml`.
pub fn load_config(root: &Path) -> AppcompareConfig {
    let start = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            AppcompareConfig::default()
        })
}
