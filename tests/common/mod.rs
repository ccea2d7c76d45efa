// Test utility module for appcompare integration tests
#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SEP: &str = "___";

/// One crawled app of a fixture study.
#[derive(Debug, Clone)]
pub struct FixtureApp {
    pub id: String,
    pub version: Option<String>,
    pub permissions: Vec<String>,
    pub sdk_lines: Vec<String>,
    pub activities: usize,
    pub services: usize,
}

impl FixtureApp {
    pub fn crawled(id: &str) -> Self {
        Self {
            id: id.to_string(),
            version: Some("1.0".to_string()),
            permissions: Vec::new(),
            sdk_lines: vec!["Declared target SDK: 29".into(), "Min SDK: 21".into()],
            activities: 1,
            services: 0,
        }
    }

    pub fn uncrawled(id: &str) -> Self {
        Self {
            version: None,
            ..Self::crawled(id)
        }
    }

    pub fn with_permissions(mut self, permissions: &[&str]) -> Self {
        self.permissions = permissions.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_sdk_lines(mut self, lines: &[&str]) -> Self {
        self.sdk_lines = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_components(mut self, activities: usize, services: usize) -> Self {
        self.activities = activities;
        self.services = services;
        self
    }

    fn entry(&self) -> Value {
        json!({"id": self.id, "latest_crawled_version": self.version})
    }

    fn androwarn(&self) -> Value {
        let names = |prefix: &str, n: usize| -> Vec<String> {
            (0..n).map(|i| format!("{}.{prefix}{i}", self.id)).collect()
        };
        json!([
            {"application_information": []},
            {"analysis_results": []},
            {"apk_file": []},
            {"androidmanifest.xml": [
                ["main_activity", [format!("{}.Main", self.id)]],
                ["sdk", self.sdk_lines],
                ["activities", names("Activity", self.activities)],
                ["services", names("Service", self.services)],
                ["receivers", []],
                ["providers", []]
            ]}
        ])
    }
}

/// A study laid out on disk the way the crawler leaves it.
pub struct StudyFixture {
    pub dir: TempDir,
}

impl StudyFixture {
    pub fn new(covid: &[FixtureApp], non_covid: &[FixtureApp]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let fixture = Self { dir };
        fixture.write_json(
            "apps.json",
            &json!({
                "covid_apps": covid.iter().map(FixtureApp::entry).collect::<Vec<_>>(),
                "non_covid_apps": non_covid.iter().map(FixtureApp::entry).collect::<Vec<_>>(),
            }),
        );
        fs::create_dir_all(fixture.root().join("data")).expect("Failed to create data dir");
        for app in covid.iter().chain(non_covid) {
            fixture.write_artifacts(app);
        }
        fixture
    }

    /// Three COVID apps requesting CAMERA, two non-COVID apps requesting
    /// CAMERA and INTERNET, plus one COVID app that was never crawled.
    pub fn camera_vs_internet() -> Self {
        let covid: Vec<FixtureApp> = ["c1", "c2", "c3"]
            .iter()
            .map(|id| FixtureApp::crawled(id).with_permissions(&["android.permission.CAMERA"]))
            .chain(std::iter::once(FixtureApp::uncrawled("c4")))
            .collect();
        let non_covid: Vec<FixtureApp> = ["n1", "n2"]
            .iter()
            .map(|id| {
                FixtureApp::crawled(id)
                    .with_permissions(&["android.permission.CAMERA", "android.permission.INTERNET"])
                    .with_sdk_lines(&["Declared target SDK: 30", "Min SDK: 23", "Max SDK: 30"])
                    .with_components(3, 1)
            })
            .collect();

        let fixture = Self::new(&covid, &non_covid);
        fixture.write_permission_table(&[
            ("android.permission.CAMERA", "dangerous"),
            ("android.permission.INTERNET", "normal"),
        ]);
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn figures(&self) -> PathBuf {
        self.root().join("figures")
    }

    pub fn read_report(&self, name: &str) -> String {
        fs::read_to_string(self.figures().join(name))
            .unwrap_or_else(|e| panic!("Failed to read report {name}: {e}"))
    }

    pub fn write_json(&self, relative: &str, value: &Value) {
        self.write(relative, &serde_json::to_string_pretty(value).unwrap());
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn write_permission_table(&self, levels: &[(&str, &str)]) {
        let table: serde_json::Map<String, Value> = levels
            .iter()
            .map(|(id, level)| (id.to_string(), json!({"protection_level": level})))
            .collect();
        self.write_json(
            "code/static_resources/android_permissions.json",
            &Value::Object(table),
        );
    }

    pub fn write_quality_csv(&self, contents: &str) {
        self.write("data/sonarqube_data.csv", contents);
    }

    fn write_artifacts(&self, app: &FixtureApp) {
        let Some(version) = &app.version else {
            return;
        };
        let artifact = |kind: &str| format!("data/{}{SEP}{version}{SEP}{kind}.json", app.id);
        self.write_json(&artifact("metadata"), &json!({"title": app.id}));
        self.write_json(&artifact("reviews"), &json!([]));
        self.write_json(&artifact("androguard"), &json!({"permissions": app.permissions}));
        self.write_json(&artifact("androwarn"), &app.androwarn());
    }
}
