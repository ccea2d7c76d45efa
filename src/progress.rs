//! Progress feedback for the analysis run.
//!
//! Bars are drawn on stderr with `indicatif` and only when stderr is a
//! terminal. Quiet mode (`--quiet` or `APPCOMPARE_QUIET`) hides them.
//!
//! ```rust,no_run
//! use appcompare::progress::{ProgressConfig, ProgressManager, TEMPLATE_LOADING};
//!
//! let manager = ProgressManager::new(ProgressConfig::from_env(false, 0));
//! let bar = manager.create_bar(42, TEMPLATE_LOADING);
//! bar.set_message("Loading artifacts");
//! bar.inc(1);
//! bar.finish_and_clear();
//! ```

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

pub const TEMPLATE_LOADING: &str = "📦 {msg} {pos}/{len} apps ({percent}%) - {eta}";
pub const TEMPLATE_STAGES: &str = "📊 {msg} {pos}/{len} analyses";
pub const TEMPLATE_SPINNER: &str = "{spinner} {msg}";

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    /// Suppress all progress output
    pub quiet_mode: bool,
    pub verbosity: u8,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool, verbosity: u8) -> Self {
        let env_quiet = std::env::var("APPCOMPARE_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
            verbosity,
        }
    }

    pub fn should_show_progress(&self) -> bool {
        !self.quiet_mode && std::io::stderr().is_terminal()
    }
}

/// Owns the progress bars of one run.
#[derive(Clone)]
pub struct ProgressManager {
    multi: Arc<MultiProgress>,
    config: ProgressConfig,
}

impl ProgressManager {
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            multi: Arc::new(MultiProgress::new()),
            config,
        }
    }

    /// Manager that never draws anything, for library callers and tests.
    pub fn hidden() -> Self {
        Self::new(ProgressConfig {
            quiet_mode: true,
            verbosity: 0,
        })
    }

    /// Returns a hidden bar if progress should not be shown.
    pub fn create_bar(&self, len: u64, template: &str) -> ProgressBar {
        if !self.config.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new(len));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
        );
        pb
    }

    pub fn create_spinner(&self, msg: &str) -> ProgressBar {
        if !self.config.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template(TEMPLATE_SPINNER)
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn verbosity(&self) -> u8 {
        self.config.verbosity
    }

    /// Call before printing final output so bars don't interleave with it.
    pub fn clear(&self) -> std::io::Result<()> {
        self.multi.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_quiet_flag() {
        let config = ProgressConfig::from_env(true, 0);
        assert!(!config.should_show_progress());
    }

    #[test]
    fn test_hidden_manager_returns_hidden_bars() {
        let manager = ProgressManager::hidden();
        assert!(manager.create_bar(10, TEMPLATE_LOADING).is_hidden());
        assert!(manager.create_spinner("working").is_hidden());
    }

    #[test]
    fn test_verbosity_is_kept() {
        let manager = ProgressManager::new(ProgressConfig::from_env(true, 2));
        assert_eq!(manager.verbosity(), 2);
    }
}
