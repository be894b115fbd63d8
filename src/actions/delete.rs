//! Safe removal of redundant copies using the trash crate.
//!
//! # Overview
//!
//! This module removes every file of a duplicate group except its
//! representative:
//! - Move to system trash (default, recoverable)
//! - Permanent deletion (with explicit flag)
//! - Best-effort batches: a failing file is reported and the batch continues
//! - TOCTOU verification against the scan snapshot before deletion
//!
//! # Safety
//!
//! A group is only touched while its representative still exists and
//! (with `verify_mtime`) still matches its scan snapshot. The representative
//! itself is never selected. At least one copy of every group's scanned
//! content is therefore always preserved.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::actions::delete::{delete_redundant, DeleteConfig, PrintingReporter};
//! use dupfinder::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, _) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let reporter = PrintingReporter::new(std::io::stdout());
//! let result = delete_redundant(&groups, &DeleteConfig::trash(), Some(&reporter));
//! println!("{}", result.summary());
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use bytesize::ByteSize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;
use crate::scanner::FileEntry;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File was modified since scan (TOCTOU protection).
    #[error("file modified since scan: {0}")]
    Modified(PathBuf),

    /// The group's representative is gone, so its copies are kept.
    #[error("representative no longer exists: {0}")]
    RepresentativeMissing(PathBuf),

    /// The group's representative changed since the scan, so its copies are kept.
    #[error("representative modified since scan: {0}")]
    RepresentativeModified(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// File that could not be moved
        path: PathBuf,
        /// Message from the trash backend
        message: String,
    },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed {
        /// File that could not be removed
        path: PathBuf,
        /// Message from the OS
        message: String,
    },

    /// Attempted to delete all copies (at least one must be preserved).
    #[error("cannot delete all copies - at least one file must be preserved")]
    AllCopiesWouldBeDeleted,

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Modified(p)
            | Self::RepresentativeMissing(p)
            | Self::RepresentativeModified(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::AllCopiesWouldBeDeleted => None,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Result of a successful deletion operation.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, permanent: bool) -> Self {
        Self {
            path,
            size,
            permanent,
        }
    }
}

/// Results of a batch deletion operation.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions with their errors.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Total number of attempted deletions.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Removed {} file(s), freed {}",
                self.success_count(),
                ByteSize::b(self.bytes_freed)
            )
        } else {
            format!(
                "Removed {} file(s), {} failed, freed {}",
                self.success_count(),
                self.failure_count(),
                ByteSize::b(self.bytes_freed)
            )
        }
    }

    fn record_failure<C: DeleteProgressCallback>(
        &mut self,
        path: &Path,
        error: &DeleteError,
        callback: Option<&C>,
    ) {
        let message = error.to_string();
        log::warn!("Failed to remove {}: {}", path.display(), message);
        if let Some(cb) = callback {
            cb.on_delete_failure(path, &message);
        }
        self.failures.push((path.to_path_buf(), message));
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone)]
pub struct DeleteConfig {
    /// Use permanent deletion instead of trash.
    pub permanent: bool,
    /// Verify size and modification time before deletion (TOCTOU protection).
    pub verify_mtime: bool,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            permanent: false,
            verify_mtime: true,
        }
    }
}

impl DeleteConfig {
    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self::default()
    }

    /// Create config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self {
            permanent: true,
            ..Self::default()
        }
    }

    /// Enable/disable TOCTOU verification.
    #[must_use]
    pub fn with_verify_mtime(mut self, verify: bool) -> Self {
        self.verify_mtime = verify;
        self
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback: Send + Sync {
    /// Called before each file deletion.
    fn on_before_delete(&self, path: &Path, index: usize, total: usize);

    /// Called after successful deletion.
    fn on_delete_success(&self, path: &Path, size: u64);

    /// Called after failed deletion.
    fn on_delete_failure(&self, path: &Path, error: &str);

    /// Called when batch operation completes.
    fn on_complete(&self, result: &BatchDeleteResult);
}

/// Prints one `Removed: <path>` line per removed file and a final
/// `Removed: <n> file(s)` line.
pub struct PrintingReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> PrintingReporter<W> {
    /// Create a reporter writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the reporter and return the writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn line(&self, text: &str) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{}", text) {
            log::debug!("Could not write deletion report: {}", e);
        }
    }
}

impl<W: Write + Send> DeleteProgressCallback for PrintingReporter<W> {
    fn on_before_delete(&self, path: &Path, index: usize, total: usize) {
        log::trace!("Removing {}/{}: {}", index + 1, total, path.display());
    }

    fn on_delete_success(&self, path: &Path, _size: u64) {
        self.line(&format!("Removed: {}", path.display()));
    }

    fn on_delete_failure(&self, path: &Path, error: &str) {
        self.line(&format!("Not removed: {} ({})", path.display(), error));
    }

    fn on_complete(&self, result: &BatchDeleteResult) {
        self.line(&format!("Removed: {} file(s)", result.success_count()));
    }
}

/// File metadata snapshot for TOCTOU verification.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    /// Path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub mtime: Option<SystemTime>,
}

impl FileSnapshot {
    /// Create a snapshot of a file's current state.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or can't be accessed.
    pub fn capture(path: &Path) -> Result<Self, DeleteError> {
        let metadata = fs::metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime: metadata.modified().ok(),
        })
    }

    /// Snapshot recorded during the scan.
    #[must_use]
    pub fn from_entry(entry: &FileEntry) -> Self {
        Self {
            path: entry.path.clone(),
            size: entry.size,
            mtime: Some(entry.modified),
        }
    }

    /// Verify that the file still matches this snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if file was modified, deleted, or can't be accessed.
    pub fn verify(&self) -> Result<(), DeleteError> {
        let current = Self::capture(&self.path)?;

        if let (Some(orig), Some(curr)) = (self.mtime, current.mtime) {
            if orig != curr {
                log::warn!(
                    "File modified since scan: {} (mtime changed)",
                    self.path.display()
                );
                return Err(DeleteError::Modified(self.path.clone()));
            }
        }

        if self.size != current.size {
            log::warn!(
                "File modified since scan: {} (size changed from {} to {})",
                self.path.display(),
                self.size,
                current.size
            );
            return Err(DeleteError::Modified(self.path.clone()));
        }

        Ok(())
    }
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if the file can't be accessed
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| DeleteError::from_io(path, e))?
        .len();

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, false))
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if the file can't be accessed
/// - `PermanentDeleteFailed` if the delete operation fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| DeleteError::from_io(path, e))?
        .len();

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::PermanentDeleteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, true))
}

/// Delete a single scanned file after checking it is unchanged.
///
/// # Errors
///
/// - `Modified` if the size or mtime differs from the scan snapshot
/// - Other errors from [`delete_to_trash`] or [`permanent_delete`]
pub fn delete_verified(entry: &FileEntry, config: &DeleteConfig) -> Result<DeleteResult, DeleteError> {
    if config.verify_mtime {
        FileSnapshot::from_entry(entry).verify()?;
    }

    if config.permanent {
        permanent_delete(&entry.path)
    } else {
        delete_to_trash(&entry.path)
    }
}

/// Remove every redundant copy, keeping each group's representative.
///
/// Groups whose representative no longer exists, or has changed since the
/// scan when `verify_mtime` is set, are left untouched and their copies are
/// reported as failures. Every other failure only affects
/// its own file; the batch always runs to the end.
///
/// # Example
///
/// ```no_run
/// use dupfinder::actions::delete::{
///     delete_redundant, BatchDeleteResult, DeleteConfig, DeleteProgressCallback,
/// };
/// use std::path::Path;
///
/// struct NoCallback;
/// impl DeleteProgressCallback for NoCallback {
///     fn on_before_delete(&self, _: &Path, _: usize, _: usize) {}
///     fn on_delete_success(&self, _: &Path, _: u64) {}
///     fn on_delete_failure(&self, _: &Path, _: &str) {}
///     fn on_complete(&self, _: &BatchDeleteResult) {}
/// }
///
/// let result = delete_redundant::<NoCallback>(&[], &DeleteConfig::default(), None);
/// assert_eq!(result.total_count(), 0);
/// ```
pub fn delete_redundant<C: DeleteProgressCallback>(
    groups: &[DuplicateGroup],
    config: &DeleteConfig,
    callback: Option<&C>,
) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();
    let total: usize = groups.iter().map(DuplicateGroup::duplicate_count).sum();
    let mut index = 0;

    for group in groups {
        let representative = &group.representative().path;
        let redundant = group.redundant();

        if let Err(error) = check_representative(group.representative(), config) {
            for entry in redundant {
                result.record_failure(&entry.path, &error, callback);
            }
            index += redundant.len();
            continue;
        }

        // Holds by construction of `redundant()`; kept as a last guard
        let selected: Vec<PathBuf> = redundant.iter().map(|f| f.path.clone()).collect();
        if let Err(error) = validate_preserves_copy(&selected, &group.paths()) {
            for entry in redundant {
                result.record_failure(&entry.path, &error, callback);
            }
            index += redundant.len();
            continue;
        }

        for entry in redundant {
            if let Some(cb) = callback {
                cb.on_before_delete(&entry.path, index, total);
            }
            index += 1;

            match delete_verified(entry, config) {
                Ok(deleted) => {
                    result.bytes_freed += deleted.size;
                    if let Some(cb) = callback {
                        cb.on_delete_success(&entry.path, deleted.size);
                    }
                    result.successes.push(deleted);
                }
                Err(error) => result.record_failure(&entry.path, &error, callback),
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_complete(&result);
    }

    log::info!("{}", result.summary());

    result
}

/// Make sure the file a group keeps still holds the scanned content.
fn check_representative(entry: &FileEntry, config: &DeleteConfig) -> Result<(), DeleteError> {
    if config.verify_mtime {
        return FileSnapshot::from_entry(entry).verify().map_err(|e| match e {
            DeleteError::Modified(path) => DeleteError::RepresentativeModified(path),
            _ => DeleteError::RepresentativeMissing(entry.path.clone()),
        });
    }
    if fs::metadata(&entry.path).is_err() {
        return Err(DeleteError::RepresentativeMissing(entry.path.clone()));
    }
    Ok(())
}

/// Validate that a selection doesn't delete all copies.
///
/// At least one copy of each duplicate group must be preserved.
///
/// # Errors
///
/// Returns `AllCopiesWouldBeDeleted` if all copies would be deleted.
///
/// # Example
///
/// ```
/// use dupfinder::actions::delete::validate_preserves_copy;
/// use std::path::PathBuf;
///
/// let group = vec![
///     PathBuf::from("/original.txt"),
///     PathBuf::from("/copy1.txt"),
///     PathBuf::from("/copy2.txt"),
/// ];
///
/// let selected = vec![PathBuf::from("/copy1.txt"), PathBuf::from("/copy2.txt")];
/// assert!(validate_preserves_copy(&selected, &group).is_ok());
///
/// assert!(validate_preserves_copy(&group, &group).is_err());
/// ```
pub fn validate_preserves_copy(
    selected_paths: &[PathBuf],
    group_paths: &[PathBuf],
) -> Result<(), DeleteError> {
    use std::collections::HashSet;

    let selected_set: HashSet<&PathBuf> = selected_paths.iter().collect();
    let preserved_count = group_paths
        .iter()
        .filter(|p| !selected_set.contains(p))
        .count();

    if preserved_count == 0 {
        log::error!(
            "Attempted to delete all {} copies of a duplicate group",
            group_paths.len()
        );
        Err(DeleteError::AllCopiesWouldBeDeleted)
    } else {
        log::debug!(
            "Deletion validated: {} files selected, {} preserved",
            selected_paths.len(),
            preserved_count
        );
        Ok(())
    }
}
