use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::analyzers::AnalysisKind;

#[derive(Parser, Debug)]
#[command(name = "appcompare")]
#[command(
    about = "Compare crawled COVID and non-COVID Android apps",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute statistics and render charts for a crawled study
    Analyze {
        /// Study root containing apps.json and the data directory
        root: PathBuf,

        /// Configuration file (default: search .appcompare.toml upwards from ROOT)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for charts and reports (overrides paths.figures_dir)
        #[arg(long = "figures-dir")]
        figures_dir: Option<PathBuf>,

        /// Run only these analyses
        #[arg(long, value_enum, value_delimiter = ',')]
        only: Option<Vec<AnalysisKind>>,

        /// Bars in the top-N permission charts (overrides analysis.top_permissions)
        #[arg(long)]
        top: Option<usize>,

        /// Plain console output (no colors)
        #[arg(long)]
        plain: bool,

        /// Only print warnings and errors
        #[arg(short, long, conflicts_with = "verbosity")]
        quiet: bool,

        /// Increase log verbosity (-v debug, -vv trace)
        #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .appcompare.toml in the current directory
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Log level implied by `-q` / `-v` flags.
    pub fn log_level(&self) -> log::LevelFilter {
        match self {
            Commands::Analyze { quiet: true, .. } => log::LevelFilter::Warn,
            Commands::Analyze { verbosity, .. } => match verbosity {
                0 => log::LevelFilter::Info,
                1 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            },
            Commands::Init { .. } => log::LevelFilter::Warn,
        }
    }
}
