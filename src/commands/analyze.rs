//! The `analyze` command: load a crawled study and run the aggregators.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::analyzers::{
    components, permissions, quality, sdk, AnalysisContext, AnalysisKind,
};
use crate::analyzers::permissions::PermissionTable;
use crate::analyzers::quality::QualityTable;
use crate::config::{self, AppcompareConfig, ResolvedPaths};
use crate::core::App;
use crate::formatting::{FormattingConfig, Styler};
use crate::io::{self, ArtifactLoader};
use crate::output::summary::{format_outputs, Outputs};
use crate::progress::{ProgressConfig, ProgressManager, TEMPLATE_LOADING, TEMPLATE_STAGES};

/// Command-line options of `appcompare analyze`.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub figures_dir: Option<PathBuf>,
    pub only: Option<Vec<AnalysisKind>>,
    pub top: Option<usize>,
    pub formatting_config: FormattingConfig,
    pub quiet: bool,
    pub verbosity: u8,
}

impl AnalyzeConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: None,
            figures_dir: None,
            only: None,
            top: None,
            formatting_config: FormattingConfig::plain(),
            quiet: true,
            verbosity: 0,
        }
    }
}

/// Config file and CLI flags merged into what one run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub paths: ResolvedPaths,
    pub separator: String,
    pub context: AnalysisContext,
    pub kinds: Vec<AnalysisKind>,
}

impl RunSettings {
    /// CLI flags win over the config file.
    pub fn resolve(options: &AnalyzeConfig, file: AppcompareConfig) -> Self {
        let mut paths = file.paths.resolve(&options.root);
        if let Some(dir) = &options.figures_dir {
            paths.figures_dir = dir.clone();
        }

        let top = options.top.unwrap_or(file.analysis.top_permissions).max(1);
        let context = AnalysisContext::new(&paths.figures_dir)
            .with_chart_options(file.charts.into())
            .with_top_permissions(top);

        let kinds = match &options.only {
            Some(only) => AnalysisKind::ALL
                .into_iter()
                .filter(|k| only.contains(k))
                .collect(),
            None => AnalysisKind::ALL.to_vec(),
        };

        Self {
            paths,
            separator: file.analysis.separator,
            context,
            kinds,
        }
    }
}

fn load_file_config(options: &AnalyzeConfig) -> Result<AppcompareConfig> {
    match &options.config {
        Some(path) => Ok(config::load_config_from(path)?),
        None => Ok(config::load_config(&options.root)),
    }
}

pub fn handle_analyze(options: AnalyzeConfig) -> Result<()> {
    let styler = Styler::new(options.formatting_config);
    let progress = ProgressManager::new(ProgressConfig::from_env(options.quiet, options.verbosity));

    let settings = RunSettings::resolve(&options, load_file_config(&options)?);
    let outputs = run_analysis(&settings, &progress)?;

    progress.clear()?;
    if !options.quiet {
        print!("{}", format_outputs(&styler, &outputs));
    }
    Ok(())
}

/// Load every crawled app, then run the selected aggregators in order.
pub fn run_analysis(settings: &RunSettings, progress: &ProgressManager) -> Result<Vec<Outputs>> {
    let paths = &settings.paths;
    if !io::dir_exists(&paths.root) {
        bail!("The provided path does not exist: {}", paths.root.display());
    }
    io::ensure_dir(&paths.figures_dir).with_context(|| {
        format!("Failed to create figures directory {}", paths.figures_dir.display())
    })?;

    let apps = load_study(settings, progress)?;

    let stages = progress.create_bar(settings.kinds.len() as u64, TEMPLATE_STAGES);
    let mut outputs = Vec::with_capacity(settings.kinds.len());
    for kind in &settings.kinds {
        stages.set_message(kind.title());
        if let Some(out) = run_stage(*kind, &apps, settings, progress)? {
            outputs.push(out);
        }
        stages.inc(1);
    }
    stages.finish_and_clear();
    Ok(outputs)
}

fn load_study(settings: &RunSettings, progress: &ProgressManager) -> Result<Vec<App>> {
    let paths = &settings.paths;
    let list = io::load_app_list(&paths.apps_file)
        .with_context(|| format!("Failed to load app list {}", paths.apps_file.display()))?;
    let loader = ArtifactLoader::new(&paths.data_dir, &settings.separator);

    let bar = progress.create_bar(0, TEMPLATE_LOADING);
    bar.set_message("Loading artifacts");
    Ok(io::load_apps(list, &loader, &bar)?)
}

fn run_stage(
    kind: AnalysisKind,
    apps: &[App],
    settings: &RunSettings,
    progress: &ProgressManager,
) -> Result<Option<Outputs>> {
    let ctx = &settings.context;
    let paths = &settings.paths;
    log::info!("Running {} analysis", kind);

    let outputs = match kind {
        AnalysisKind::Sdk => sdk::analyse_sdks(apps, ctx)?,
        AnalysisKind::Permissions => {
            let table = load_permission_table(paths)?;
            permissions::analyse_permissions(apps, &table, ctx)?
        }
        AnalysisKind::Components => components::analyse_components(apps, ctx)?,
        AnalysisKind::Quality => {
            if !io::file_exists(&paths.quality_csv) {
                log::info!(
                    "Skipping quality analysis: {} not found",
                    paths.quality_csv.display()
                );
                return Ok(None);
            }
            let spinner = progress.create_spinner("Reading quality metrics");
            let table = QualityTable::load(&paths.quality_csv, &settings.separator)?;
            spinner.finish_and_clear();
            quality::analyse_quality(apps, &table, ctx)?
        }
    };
    Ok(Some(outputs))
}

fn load_permission_table(paths: &ResolvedPaths) -> Result<PermissionTable> {
    if !io::file_exists(&paths.permissions_table) {
        log::warn!(
            "Permission reference table {} not found; every protection level is undefined",
            paths.permissions_table.display()
        );
        return Ok(PermissionTable::default());
    }
    Ok(PermissionTable::load(&paths.permissions_table)?)
}
