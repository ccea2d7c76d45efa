//! Typed view over the androwarn report.
//!
//! Androwarn emits a loosely structured JSON array. The manifest analysis
//! lives at `[3]["androidmanifest.xml"]` and is itself a list of
//! `[title, [entries...]]` pairs:
//!
//! | index | content                           |
//! |-------|-----------------------------------|
//! | 1     | SDK constraints (free-text lines) |
//! | 2     | activities                        |
//! | 3     | services                          |
//! | 4     | receivers                         |
//! | 5     | providers                         |
//!
//! Every positional assumption is checked here so the aggregators only
//! ever see [`ManifestSections`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{Error, Result};

const DOCUMENT: &str = "androwarn.json";
const MANIFEST_INDEX: usize = 3;
const MANIFEST_KEY: &str = "androidmanifest.xml";
const SDK_SECTION: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Activity,
    Service,
    Receiver,
    Provider,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Activity,
        ComponentKind::Service,
        ComponentKind::Receiver,
        ComponentKind::Provider,
    ];

    /// Position of the section inside the manifest list.
    fn section_index(self) -> usize {
        match self {
            ComponentKind::Activity => 2,
            ComponentKind::Service => 3,
            ComponentKind::Receiver => 4,
            ComponentKind::Provider => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Activity => "activities",
            ComponentKind::Service => "services",
            ComponentKind::Receiver => "receivers",
            ComponentKind::Provider => "providers",
        }
    }
}

/// Number of manifest entries per component category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCounts {
    pub activities: usize,
    pub services: usize,
    pub receivers: usize,
    pub providers: usize,
}

impl ComponentCounts {
    pub fn get(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Activity => self.activities,
            ComponentKind::Service => self.services,
            ComponentKind::Receiver => self.receivers,
            ComponentKind::Provider => self.providers,
        }
    }

    fn set(&mut self, kind: ComponentKind, count: usize) {
        match kind {
            ComponentKind::Activity => self.activities = count,
            ComponentKind::Service => self.services = count,
            ComponentKind::Receiver => self.receivers = count,
            ComponentKind::Provider => self.providers = count,
        }
    }

    pub fn total(&self) -> usize {
        ComponentKind::ALL.iter().map(|&k| self.get(k)).sum()
    }
}

/// The parts of the manifest analysis the aggregators consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestSections {
    pub sdk_lines: Vec<String>,
    pub components: ComponentCounts,
}

impl ManifestSections {
    pub fn from_androwarn(doc: &Value) -> Result<Self> {
        let sections = manifest_sections(doc)?;

        let sdk_lines = section_entries(sections, SDK_SECTION)?
            .iter()
            .map(|line| match line {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();

        let mut components = ComponentCounts::default();
        for kind in ComponentKind::ALL {
            let entries = section_entries(sections, kind.section_index())?;
            components.set(kind, entries.len());
        }

        Ok(Self {
            sdk_lines,
            components,
        })
    }
}

fn manifest_sections(doc: &Value) -> Result<&[Value]> {
    let root = doc
        .as_array()
        .ok_or_else(|| Error::schema(DOCUMENT, "top level is not an array"))?;
    let block = root.get(MANIFEST_INDEX).ok_or_else(|| {
        Error::schema(
            DOCUMENT,
            format!("expected at least {} top-level entries", MANIFEST_INDEX + 1),
        )
    })?;
    block
        .get(MANIFEST_KEY)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| {
            Error::schema(
                DOCUMENT,
                format!("[{MANIFEST_INDEX}] has no \"{MANIFEST_KEY}\" list"),
            )
        })
}

fn section_entries(sections: &[Value], index: usize) -> Result<&[Value]> {
    sections
        .get(index)
        .and_then(|section| section.get(1))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| {
            Error::schema(
                DOCUMENT,
                format!("[{MANIFEST_INDEX}][\"{MANIFEST_KEY}\"][{index}][1] is not a list"),
            )
        })
}
