//! UI/Progress presentation layer
//!
//! All progress reporting goes through the ProgressReporter trait, allowing
//! an interactive spinner on a terminal and silent progress for `--json`
//! output and tests.

use std::fmt;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Install stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Download,
    Extract,
    Manifest,
    Place,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Resolve => "Resolving source",
            Stage::Download => "Downloading snapshot",
            Stage::Extract => "Extracting archive",
            Stage::Manifest => "Checking manifest",
            Stage::Place => "Installing module",
        })
    }
}

/// Progress reporter trait for the install pipeline
pub trait ProgressReporter {
    /// A new stage started; `detail` names what it works on
    fn stage(&mut self, stage: Stage, detail: &str);

    /// Finish after success
    fn finish(&mut self);

    /// Abandon on error
    fn abandon(&mut self);
}

/// Interactive progress reporter with a spinner on stderr
pub struct InteractiveProgressReporter {
    spinner: ProgressBar,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self { spinner }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn stage(&mut self, stage: Stage, detail: &str) {
        self.spinner.set_message(format!("{stage} {detail}"));
    }

    fn finish(&mut self) {
        self.spinner.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.spinner.abandon();
    }
}

/// Silent progress reporter
///
/// No-op implementation that does not display anything.
#[derive(Debug, Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn stage(&mut self, _stage: Stage, _detail: &str) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}
