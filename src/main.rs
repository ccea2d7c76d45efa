use anyhow::Result;
use clap::Parser;
use appcompare::cli::{Cli, Commands};
use appcompare::commands::{self, AnalyzeConfig};
use appcompare::formatting::FormattingConfig;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the level implied by -q / -v
    env_logger::Builder::new()
        .filter_level(cli.command.log_level())
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Analyze {
            root,
            config,
            figures_dir,
            only,
            top,
            plain,
            quiet,
            verbosity,
        } => commands::handle_analyze(AnalyzeConfig {
            root,
            config,
            figures_dir,
            only,
            top,
            formatting_config: FormattingConfig::resolve(plain),
            quiet,
            verbosity,
        }),
        Commands::Init { force } => commands::init_config(Path::new("."), force),
    }
}
