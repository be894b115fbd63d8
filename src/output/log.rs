//! Plain-text log of duplicate groups.
//!
//! Each run writes a new `log_<nanos>.txt` file, where `<nanos>` is the
//! UNIX time in nanoseconds. The format is the listing part of the console
//! report:
//!
//! ```text
//! [Group 1]
//! /photos/a.jpg
//! /backup/a.jpg
//!
//! [Group 2]
//! ...
//! ```

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::duplicates::DuplicateGroup;

/// Last timestamp handed out, so two logs written in quick succession
/// never share a name.
static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// Errors that can occur while writing a log file.
#[derive(thiserror::Error, Debug)]
pub enum LogError {
    /// The log directory does not exist or is not a directory.
    #[error("Log directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// The log file could not be created or written.
    #[error("Failed to write log file {path}: {source}")]
    Io {
        /// Path of the log file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Render the log text for a list of groups.
///
/// # Example
///
/// ```
/// use dupfinder::duplicates::DuplicateGroup;
/// use dupfinder::output::log::render_log;
/// use dupfinder::scanner::FileEntry;
/// use std::path::PathBuf;
/// use std::time::SystemTime;
///
/// let group = DuplicateGroup::new(vec![
///     FileEntry::new(PathBuf::from("/a"), 1, SystemTime::now()),
///     FileEntry::new(PathBuf::from("/b"), 1, SystemTime::now()),
/// ]);
/// assert_eq!(render_log(&[group]), "[Group 1]\n/a\n/b\n\n");
/// ```
#[must_use]
pub fn render_log(groups: &[DuplicateGroup]) -> String {
    let mut text = String::new();
    for (idx, group) in groups.iter().enumerate() {
        text.push_str(&format!("[Group {}]\n", idx + 1));
        let paths: Vec<String> = group
            .files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect();
        text.push_str(&paths.join("\n"));
        text.push_str("\n\n");
    }
    text
}

/// Writes group logs into a directory.
#[derive(Debug, Clone)]
pub struct LogWriter {
    dir: PathBuf,
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

impl LogWriter {
    /// Create a writer for the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the logs are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a new log file and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`LogError`] if the directory is missing or the file cannot
    /// be written. An existing file is never overwritten.
    pub fn write(&self, groups: &[DuplicateGroup]) -> Result<PathBuf, LogError> {
        if !self.dir.is_dir() {
            return Err(LogError::DirectoryNotFound(self.dir.clone()));
        }

        let path = self.dir.join(format!("log_{}.txt", next_stamp()));
        let io_error = |source| LogError::Io {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(io_error)?;
        file.write_all(render_log(groups).as_bytes())
            .map_err(io_error)?;

        log::info!("Wrote log of {} group(s) to {}", groups.len(), path.display());
        Ok(path)
    }
}

/// Current UNIX time in nanoseconds, strictly increasing within the process.
fn next_stamp() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX));

    let mut last = LAST_STAMP.load(Ordering::SeqCst);
    loop {
        let candidate = now.max(last.saturating_add(1));
        match LAST_STAMP.compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}
