//! Protection levels from the Android permission reference table.

use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::{Result, ResultExt};
use crate::io::read_json;

/// Level of any permission the reference table does not know.
pub const UNDEFINED: &str = "undefined";

#[derive(Debug, Clone, Deserialize)]
struct PermissionEntry {
    #[serde(default)]
    protection_level: Option<String>,
}

/// Permission identifier to base protection level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionTable {
    by_id: BTreeMap<String, String>,
    by_short_name: BTreeMap<String, String>,
}

impl PermissionTable {
    /// Parse `android_permissions.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw: BTreeMap<String, PermissionEntry> =
            read_json(path).context("Failed to load permission reference table")?;
        let table = Self::from_levels(
            raw.into_iter()
                .filter_map(|(id, entry)| entry.protection_level.map(|level| (id, level))),
        );
        log::debug!("Loaded {} permission protection levels", table.len());
        Ok(table)
    }

    pub fn from_levels<I, K, V>(levels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut table = Self::default();
        for (id, level) in levels {
            let id = id.into();
            let level = base_level(level.as_ref()).to_string();
            table
                .by_short_name
                .entry(short_name(&id).to_string())
                .or_insert_with(|| level.clone());
            table.by_id.insert(id, level);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Base level of `permission`, matched by full identifier first and
    /// then by short name; [`UNDEFINED`] when neither is known.
    pub fn level_of(&self, permission: &str) -> &str {
        self.by_id
            .get(permission)
            .or_else(|| self.by_short_name.get(short_name(permission)))
            .map_or(UNDEFINED, String::as_str)
    }
}

/// `android.permission.CAMERA` -> `CAMERA`
pub fn short_name(permission: &str) -> &str {
    permission
        .rsplit_once('.')
        .map_or(permission, |(_, name)| name)
}

/// `signature|privileged` -> `signature`
pub fn base_level(level: &str) -> &str {
    level.split('|').next().unwrap_or(level).trim()
}

/// Alphabetical, with `undefined` last.
pub fn level_order(a: &str, b: &str) -> Ordering {
    (a == UNDEFINED).cmp(&(b == UNDEFINED)).then_with(|| a.cmp(b))
}
