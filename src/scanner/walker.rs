//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree depth-first and collecting every regular file beneath it, and
//! [`collect_files`] which concatenates the walks of several roots.
//!
//! # Features
//!
//! - Depth-first traversal, children sorted by file name
//! - Absolute paths for every emitted entry
//! - Optional symlink following with loop detection
//! - Unreadable entries become [`ScanError`] values instead of aborting
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery under a single root.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk (absolute)
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// Relative roots are resolved against the current directory so that
    /// every emitted path is absolute.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupfinder::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        let root = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self { root, config }
    }

    /// The absolute root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Returns an iterator over [`FileEntry`] results in depth-first order.
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration; an unreadable directory only loses its own subtree.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    // Unfollowed links keep their own file type
                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }

                    if !file_type.is_file() {
                        log::trace!("Skipping special file: {}", entry.path().display());
                        return None;
                    }

                    let metadata = match entry.metadata() {
                        Ok(m) => m,
                        Err(e) => return Some(Err(self.handle_walk_error(e))),
                    };

                    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                    Some(Ok(FileEntry {
                        path: entry.path().to_path_buf(),
                        size: metadata.len(),
                        modified,
                        is_symlink: entry.path_is_symlink(),
                    }))
                }
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Convert a walkdir error into a [`ScanError`], logging it.
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            log::warn!(
                "Symbolic link loop: {} -> {}",
                path.display(),
                ancestor.display()
            );
            return ScanError::Loop {
                ancestor: ancestor.to_path_buf(),
                path,
            };
        }

        match error.into_io_error() {
            Some(io) => match io.kind() {
                ErrorKind::PermissionDenied => {
                    log::warn!("Permission denied, skipping: {}", path.display());
                    ScanError::PermissionDenied(path)
                }
                ErrorKind::NotFound => {
                    log::warn!("Path vanished during scan: {}", path.display());
                    ScanError::NotFound(path)
                }
                _ => {
                    log::warn!("I/O error for {}: {}", path.display(), io);
                    ScanError::Io { path, source: io }
                }
            },
            None => {
                log::warn!("Walker error for {}", path.display());
                ScanError::Io {
                    path,
                    source: std::io::Error::other("directory walk failed"),
                }
            }
        }
    }
}

/// Collect every regular file under an ordered list of roots.
///
/// Roots are walked in the given order and their files concatenated.
/// A file reachable more than once (overlapping roots, followed symlinks)
/// is kept only at its first occurrence.
///
/// # Returns
///
/// A tuple of the collected files in encounter order and the recoverable
/// errors hit along the way.
#[must_use]
pub fn collect_files(roots: &[PathBuf], config: &WalkerConfig) -> (Vec<FileEntry>, Vec<ScanError>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for root in roots {
        let walker = Walker::new(root, config.clone());
        log::debug!("Walking {}", walker.root().display());

        for result in walker.walk() {
            match result {
                Ok(file) => {
                    let key = std::fs::canonicalize(&file.path).unwrap_or_else(|_| file.path.clone());
                    if seen.insert(key) {
                        files.push(file);
                    } else {
                        log::debug!("Already collected, skipping: {}", file.path.display());
                    }
                }
                Err(e) => errors.push(e),
            }
        }
    }

    log::info!(
        "Collected {} file(s) from {} root(s), {} skipped",
        files.len(),
        roots.len(),
        errors.len()
    );

    (files, errors)
}
