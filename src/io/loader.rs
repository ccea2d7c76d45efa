//! Reads the crawler's per-app artifacts from disk.
//!
//! Artifacts are flat files named `<id><SEP><version><SEP><kind>.json`
//! inside the data directory. Metadata and reviews must exist for every
//! crawled app; the server list and both static-analysis reports are
//! optional and come back as `None` when absent.

use indicatif::ProgressBar;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::androwarn::ManifestSections;
use crate::core::{App, AppEntry, AppList, Artifacts, Error, Result, ResultExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Metadata,
    Reviews,
    Servers,
    Androguard,
    Androwarn,
}

impl ArtifactKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            ArtifactKind::Metadata => "metadata",
            ArtifactKind::Reviews => "reviews",
            ArtifactKind::Servers => "servers",
            ArtifactKind::Androguard => "androguard",
            ArtifactKind::Androwarn => "androwarn",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, ArtifactKind::Metadata | ArtifactKind::Reviews)
    }
}

/// Parse a JSON file, failing if it does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| Error::io_at(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::json(path, e))
}

/// Parse a JSON file if it exists.
pub fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.is_file() {
        log::debug!("Optional artifact not found: {}", path.display());
        return Ok(None);
    }
    read_json(path).map(Some)
}

pub fn load_app_list(path: &Path) -> Result<AppList> {
    read_json(path)
}

#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    data_dir: PathBuf,
    separator: String,
}

impl ArtifactLoader {
    pub fn new(data_dir: impl Into<PathBuf>, separator: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            separator: separator.into(),
        }
    }

    pub fn artifact_path(&self, id: &str, version: &str, kind: ArtifactKind) -> PathBuf {
        let sep = &self.separator;
        self.data_dir
            .join(format!("{id}{sep}{version}{sep}{}.json", kind.file_stem()))
    }

    /// Load every artifact of one app. Entries without a crawled version
    /// never touch the disk.
    pub fn load(&self, entry: &AppEntry) -> Result<Artifacts> {
        let Some(version) = entry.latest_crawled_version.as_deref() else {
            return Ok(Artifacts::default());
        };
        let path = |kind: ArtifactKind| self.artifact_path(&entry.id, version, kind);

        let metadata = Some(read_required(&path(ArtifactKind::Metadata))?);
        let reviews = Some(read_required(&path(ArtifactKind::Reviews))?);
        let servers = read_optional_json::<Value>(&path(ArtifactKind::Servers))?;
        let androguard = read_optional_json(&path(ArtifactKind::Androguard))?;
        let manifest = read_optional_json::<Value>(&path(ArtifactKind::Androwarn))?
            .map(|doc| ManifestSections::from_androwarn(&doc))
            .transpose()
            .context(format!("Reading manifest of {}", entry.id))?;

        Ok(Artifacts {
            metadata,
            reviews,
            servers,
            androguard,
            manifest,
        })
    }
}

fn read_required<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(Error::file_system("Required artifact is missing", path));
    }
    read_json(path)
}

/// Load the artifacts of every crawled app. Apps that were never crawled
/// are dropped here and take no further part in the analysis.
pub fn load_apps(list: AppList, loader: &ArtifactLoader, progress: &ProgressBar) -> Result<Vec<App>> {
    let tagged = list.tagged();
    progress.set_length(tagged.len() as u64);

    let mut apps = Vec::with_capacity(tagged.len());
    for (entry, group) in tagged {
        progress.inc(1);
        let Some(version) = entry.latest_crawled_version.clone() else {
            log::debug!("Skipping {} ({}): never crawled", entry.id, group);
            continue;
        };
        progress.set_message(entry.id.clone());
        let artifacts = loader.load(&entry)?;
        apps.push(App {
            id: entry.id,
            version,
            group,
            artifacts,
        });
    }
    progress.finish_and_clear();

    log::info!(
        "Loaded {} crawled apps ({} COVID, {} non-COVID)",
        apps.len(),
        apps.iter().filter(|a| a.group.is_covid()).count(),
        apps.iter().filter(|a| !a.group.is_covid()).count()
    );
    Ok(apps)
}
