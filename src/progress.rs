//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`ProgressCallback`] trait used by the grouping
//! engine and the [`Progress`] struct which implements it to display a
//! spinner while files are collected and a percentage bar while they are
//! compared.
//!
//! # Accessible Mode
//!
//! When accessible mode is enabled (`--plain-progress`), progress reporting
//! uses simplified output:
//! - No spinners or animations
//! - One `Progress: <n>%` line per whole-percent step, no cursor movement

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Phase name used while collecting files.
pub const PHASE_WALKING: &str = "walking";

/// Phase name used while comparing file contents.
pub const PHASE_COMPARE: &str = "compare";

/// Progress callback for duplicate finding phases.
///
/// Implement this trait to receive progress updates during collection and
/// grouping. Calls always come from the thread running the scan.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_WALKING`] or [`PHASE_COMPARE`])
    /// * `total` - Total number of items to process (0 if unknown)
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

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Percentage of `current` out of `total`, rounded to one decimal place.
///
/// An empty workload counts as complete.
///
/// # Example
///
/// ```
/// use dupfinder::progress::percent;
///
/// assert_eq!(percent(1, 3), 33.3);
/// assert_eq!(percent(3, 3), 100.0);
/// ```
#[must_use]
pub fn percent(current: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (1000.0 * current as f64 / total as f64).round() / 10.0
}

/// Progress reporter using indicatif.
pub struct Progress {
    walking: Mutex<Option<ProgressBar>>,
    compare: Mutex<Option<ProgressBar>>,
    total: Mutex<usize>,
    last_step: Mutex<Option<u64>>,
    quiet: bool,
    accessible: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupfinder::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self::with_accessible(quiet, false)
    }

    /// Create a new progress reporter with accessible mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupfinder::progress::Progress;
    ///
    /// let progress = Progress::with_accessible(false, true);
    /// assert!(progress.is_accessible());
    /// ```
    #[must_use]
    pub fn with_accessible(quiet: bool, accessible: bool) -> Self {
        Self {
            walking: Mutex::new(None),
            compare: Mutex::new(None),
            total: Mutex::new(0),
            last_step: Mutex::new(None),
            quiet,
            accessible,
        }
    }

    /// Check if accessible mode is enabled.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn compare_style() -> ProgressStyle {
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
    }

    /// Print a plain percentage line once per whole-percent step.
    fn print_plain(&self, current: usize) {
        let total = *lock(&self.total);
        let value = percent(current, total);
        let step = value.floor() as u64;

        let mut last = lock(&self.last_step);
        if *last == Some(step) {
            return;
        }
        *last = Some(step);
        eprintln!("Progress: {:.1}%", value);
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALKING => {
                if self.accessible {
                    eprintln!("Collecting files...");
                    return;
                }
                let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
                pb.set_style(Self::walking_style());
                pb.set_message("Collecting files");
                pb.enable_steady_tick(Duration::from_millis(100));
                *lock(&self.walking) = Some(pb);
            }
            _ => {
                *lock(&self.total) = total;
                *lock(&self.last_step) = None;
                if self.accessible {
                    return;
                }
                let pb = ProgressBar::with_draw_target(
                    Some(total as u64),
                    ProgressDrawTarget::stderr(),
                );
                pb.set_style(Self::compare_style());
                pb.set_message(format!("Progress: {:.1}%", percent(0, total)));
                *lock(&self.compare) = Some(pb);
            }
        }
    }

    fn on_progress(&self, current: usize, _path: &str) {
        if self.quiet {
            return;
        }

        if let Some(ref pb) = *lock(&self.compare) {
            let total = *lock(&self.total);
            pb.set_position(current as u64);
            pb.set_message(format!("Progress: {:.1}%", percent(current, total)));
            return;
        }
        if let Some(ref pb) = *lock(&self.walking) {
            pb.set_position(current as u64);
            return;
        }
        if self.accessible && *lock(&self.total) > 0 {
            self.print_plain(current);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALKING => {
                if let Some(pb) = lock(&self.walking).take() {
                    pb.finish_and_clear();
                }
            }
            _ => {
                if let Some(pb) = lock(&self.compare).take() {
                    pb.finish();
                }
                *lock(&self.total) = 0;
            }
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(ref pb) = *lock(&self.walking) {
            pb.println(message);
            return;
        }
        if let Some(ref pb) = *lock(&self.compare) {
            pb.println(message);
            return;
        }
        eprintln!("{}", message);
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
