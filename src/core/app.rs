use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::group::{Group, Grouped};
use crate::io::androwarn::ManifestSections;

/// One entry of `apps.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppEntry {
    pub id: String,
    #[serde(default)]
    pub latest_crawled_version: Option<String>,
}

/// Top-level layout of `apps.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppList {
    #[serde(default)]
    pub covid_apps: Vec<AppEntry>,
    #[serde(default)]
    pub non_covid_apps: Vec<AppEntry>,
}

impl AppList {
    /// Tag every entry with its group, COVID apps first.
    pub fn tagged(self) -> Vec<(AppEntry, Group)> {
        self.covid_apps
            .into_iter()
            .map(|e| (e, Group::Covid))
            .chain(self.non_covid_apps.into_iter().map(|e| (e, Group::NonCovid)))
            .collect()
    }
}

/// Store listing scraped by the crawler. Only a few fields are read.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Review {
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub at: Option<String>,
}

/// Output of androguard for one APK.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AndroguardReport {
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Everything the crawler and static analysers left on disk for one app version.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    pub metadata: Option<AppMetadata>,
    pub reviews: Option<Vec<Review>>,
    pub servers: Option<Value>,
    pub androguard: Option<AndroguardReport>,
    pub manifest: Option<ManifestSections>,
}

impl Artifacts {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none()
            && self.reviews.is_none()
            && self.servers.is_none()
            && self.androguard.is_none()
            && self.manifest.is_none()
    }
}

/// A crawled app taking part in the comparison.
#[derive(Debug, Clone)]
pub struct App {
    pub id: String,
    pub version: String,
    pub group: Group,
    pub artifacts: Artifacts,
}

impl App {
    pub fn permissions(&self) -> Option<&[String]> {
        self.artifacts
            .androguard
            .as_ref()
            .map(|a| a.permissions.as_slice())
    }

    pub fn manifest(&self) -> Option<&ManifestSections> {
        self.artifacts.manifest.as_ref()
    }
}

impl Grouped for App {
    fn group(&self) -> Group {
        self.group
    }
}
