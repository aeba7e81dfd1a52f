//! Progress reporting for the hashing phase.
//!
//! The detector reports through the [`ProgressCallback`] trait so it stays
//! free of presentation concerns; [`Progress`] renders an indicatif bar for
//! terminal runs and tests plug in their own implementations.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Callback for detection progress.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (e.g., "hash")
    /// * `total` - Total number of items to process
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Terminal progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bar is displayed.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{prefix:>6} [{bar:30.cyan/blue}] {pos}/{len} ({per_sec}) {wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
        );
        bar.set_prefix(phase.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        *self.bar.lock().expect("progress mutex poisoned") = Some(bar);
    }

    fn on_progress(&self, current: usize, path: &str) {
        if let Some(bar) = self.bar.lock().expect("progress mutex poisoned").as_ref() {
            bar.set_position(current as u64);
            bar.set_message(path.to_string());
        }
    }

    fn on_phase_end(&self, _phase: &str) {
        if let Some(bar) = self.bar.lock().expect("progress mutex poisoned").take() {
            bar.finish_and_clear();
        }
    }
}
