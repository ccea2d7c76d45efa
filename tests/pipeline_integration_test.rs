//! End-to-end runs of the analysis pipeline over fixture studies.

mod common;

use appcompare::commands::{run_analysis, AnalyzeConfig, RunSettings};
use appcompare::config::AppcompareConfig;
use appcompare::progress::ProgressManager;
use appcompare::AnalysisKind;
use common::{FixtureApp, StudyFixture};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;

fn settings_for(fixture: &StudyFixture, only: Option<Vec<AnalysisKind>>) -> RunSettings {
    let mut options = AnalyzeConfig::new(fixture.root());
    options.only = only;
    RunSettings::resolve(&options, AppcompareConfig::default())
}

fn run(fixture: &StudyFixture, only: Option<Vec<AnalysisKind>>) -> Vec<appcompare::Outputs> {
    run_analysis(&settings_for(fixture, only), &ProgressManager::hidden())
        .expect("analysis should succeed")
}

#[test]
fn test_permission_report_for_camera_vs_internet() {
    let fixture = StudyFixture::camera_vs_internet();
    run(&fixture, Some(vec![AnalysisKind::Permissions]));

    let report = fixture.read_report("permissions_stats.txt");
    assert_eq!(
        report,
        indoc! {"
            Median # of permissions:
            COVID: 1
            non-COVID: 2
            -------------------------------------
            Permissions only in COVID:

            Permissions only in non-COVID:
            \tINTERNET: 2
            -------------------------------------
            Permission frequencies:
            wilcoxon signed-rank test p-value: 1
            -------------------------------------
            Apps with at least one permission per protection level:
            \tdangerous: COVID 100.00% / non-COVID 100.00%
            \tnormal: COVID 0.00% / non-COVID 100.00%
            -------------------------------------
            Median # of permissions per protection level:
            \tdangerous: COVID 1 / non-COVID 1
            \tnormal: COVID 0 / non-COVID 1
            -------------------------------------
        "}
    );

    for figure in [
        "num_permissions.svg",
        "permissions_frequencies_covid.svg",
        "permissions_frequencies_covid_pct.svg",
        "permissions_frequencies_all_non_covid.svg",
        "permissions_frequencies_all_non_covid_pct.svg",
        "protection_levels.svg",
        "protection_levels_pct.svg",
    ] {
        assert!(fixture.figures().join(figure).is_file(), "missing {figure}");
    }
}

#[test]
fn test_sdk_and_component_reports() {
    let fixture = StudyFixture::camera_vs_internet();
    run(
        &fixture,
        Some(vec![AnalysisKind::Components, AnalysisKind::Sdk]),
    );

    let sdk = fixture.read_report("sdk_stats.txt");
    assert!(sdk.contains("Min SDK:\n\tCOVID: n=3 median=21\n\tnon-COVID: n=2 median=23\n"));
    assert!(sdk.contains("Target SDK:\n\tCOVID: n=3 median=29\n\tnon-COVID: n=2 median=30\n"));
    assert!(sdk.contains("Max SDK:\n\tCOVID: n=0 median=n/a\n\tnon-COVID: n=2 median=30\n"));

    let components = fixture.read_report("components_stats.txt");
    assert!(components.starts_with(indoc! {"
        COVID apps:
        \tLen: 3
        \tMean: 1
        \tVar: 0
        non-COVID apps:
        \tLen: 2
        \tMean: 4
        \tVar: 0
    "}));
    assert!(components.contains("mann-whitney U test p-value: "));
    assert!(!components.contains("p-value: n/a"));
    assert!(components.contains("\tactivities: COVID 1 / non-COVID 3\n"));
    assert!(components.contains("\tservices: COVID 0 / non-COVID 1\n"));

    assert!(fixture.figures().join("min_sdk.svg").is_file());
    assert!(fixture.figures().join("target_sdk.svg").is_file());
    assert!(fixture.figures().join("component_count.svg").is_file());
    assert!(!fixture.figures().join("permissions_stats.txt").exists());
}

#[test]
fn test_quality_join_by_apk_name() {
    let fixture = StudyFixture::camera_vs_internet();
    fixture.write_quality_csv(indoc! {"
        Name,Bugs,Vulnerabilities,Code Smells,Duplication,#LOC
        c1___1.0.apk,1,0,10,1.5%,1000
        c2___1.0.apk,2,-,12,2.0%,1200
        c3___1.0.apk,3,1,14,-,1400
        n1___1.0.apk,7,2,40,5.0%,5000
        n2___1.0.apk,9,3,44,6.0%,7000
        unrelated___2.0.apk,100,100,100,100%,100
    "});

    let outputs = run(&fixture, Some(vec![AnalysisKind::Quality]));
    assert_eq!(outputs.len(), 1);
    let summary = outputs[0].summary.as_deref().expect("describe table");
    assert!(summary.contains("bugs"));
    assert!(summary.contains("locs"));

    let report = fixture.read_report("quality_stats.txt");
    assert!(report.starts_with("bugs:\n\tCOVID: n=3 median=2\n\tnon-COVID: n=2 median=8\n"));
    assert!(report.contains("vulnerabilities:\n\tCOVID: n=2 median=0.5\n"));
    assert!(report.contains("duplication:\n\tCOVID: n=2 median=1.75\n"));
    for metric in ["bugs", "vulnerabilities", "smells", "duplication", "locs"] {
        assert!(fixture.figures().join(format!("{metric}.svg")).is_file());
    }
}

#[test]
fn test_quality_is_skipped_without_csv() {
    let fixture = StudyFixture::camera_vs_internet();
    let outputs = run(&fixture, Some(vec![AnalysisKind::Quality]));
    assert!(outputs.is_empty());
    assert!(!fixture.figures().join("quality_stats.txt").exists());
}

#[test]
fn test_missing_permission_table_marks_levels_undefined() {
    let fixture = StudyFixture::new(
        &[FixtureApp::crawled("c1").with_permissions(&["android.permission.CAMERA"])],
        &[FixtureApp::crawled("n1").with_permissions(&["android.permission.CAMERA"])],
    );
    run(&fixture, Some(vec![AnalysisKind::Permissions]));

    let report = fixture.read_report("permissions_stats.txt");
    assert!(report.contains("\tundefined: COVID 100.00% / non-COVID 100.00%\n"));
    assert!(report.contains("wilcoxon signed-rank test p-value: n/a ("));
}

#[test]
fn test_missing_required_artifact_fails() {
    let fixture = StudyFixture::camera_vs_internet();
    fs::remove_file(fixture.root().join("data/c2___1.0___metadata.json")).unwrap();

    let result = run_analysis(&settings_for(&fixture, None), &ProgressManager::hidden());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("c2___1.0___metadata.json"), "{message}");
}

#[test]
fn test_reports_are_reproducible() {
    let fixture = StudyFixture::camera_vs_internet();
    let reports = [
        "sdk_stats.txt",
        "permissions_stats.txt",
        "components_stats.txt",
    ];

    run(&fixture, None);
    let first: Vec<String> = reports.iter().map(|r| fixture.read_report(r)).collect();
    run(&fixture, None);
    let second: Vec<String> = reports.iter().map(|r| fixture.read_report(r)).collect();

    assert_eq!(first, second);
}
