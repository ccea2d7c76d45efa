pub mod androwarn;
pub mod loader;

pub use androwarn::{ComponentCounts, ComponentKind, ManifestSections};
pub use loader::{load_app_list, load_apps, read_json, read_optional_json, ArtifactKind, ArtifactLoader};

use std::fs;
use std::path::Path;

use crate::core::{Error, Result};

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::io_at(path, e))
}

/// Create `path` and its parents unless it is already a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| Error::io_at(path, e))
}

pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}
