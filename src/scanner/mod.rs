//! Scanner module for directory traversal and file content access.
//!
//! This module provides functionality for:
//! - Depth-first directory walking using walkdir
//! - Exact byte-for-byte file comparison
//! - BLAKE3 content digests for bucketing
//! - Unicode path normalization
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`compare`]: Streaming byte-for-byte equality test
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//! - [`path_utils`]: NFC normalization for user-entered paths
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::{collect_files, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let roots = vec![PathBuf::from("/home/user/Pictures")];
//! let (files, errors) = collect_files(&roots, &WalkerConfig::default());
//! println!("{} files, {} skipped", files.len(), errors.len());
//! ```

pub mod compare;
pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::PathBuf;
use std::time::SystemTime;

// Re-export main types
pub use compare::files_equal;
pub use hasher::{hash_to_hex, Hash, Hasher};
pub use walker::{collect_files, Walker};

/// Metadata for a discovered file.
///
/// Identity is the path; the size and modification time are a snapshot
/// taken at collection time and are used for cheap size checks and for
/// verifying that a file is unchanged before it gets deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Whether this file was reached through a symbolic link
    pub is_symlink: bool,
}

impl FileEntry {
    /// Create a new FileEntry.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `modified` - Last modification time
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
            is_symlink: false,
        }
    }
}

/// Configuration for directory walking.
///
/// No size or extension filters exist: every regular file under a root is
/// a candidate.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Link cycles are reported as recoverable errors.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }
}

/// Errors that can occur during directory scanning.
///
/// All of these are recoverable: the walker logs them and keeps going.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A symbolic link loop was detected while following links.
    #[error("Symbolic link loop at {path} (points back to {ancestor})")]
    Loop {
        /// Path of the link that closes the loop
        path: PathBuf,
        /// Ancestor directory the link points back to
        ancestor: PathBuf,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::NotADirectory(p) => p,
            Self::Loop { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur while comparing two files.
///
/// The path always names the file that could not be read, so the caller
/// knows which side to exclude from further grouping.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// The file could not be opened (deleted, permission denied, ...).
    #[error("Cannot open {path}: {source}")]
    Open {
        /// File that failed to open
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading the file failed part-way through.
    #[error("Cannot read {path}: {source}")]
    Read {
        /// File that failed to read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl CompareError {
    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

impl From<HashError> for CompareError {
    fn from(error: HashError) -> Self {
        match error {
            HashError::NotFound(path) => Self::Open {
                path,
                source: std::io::ErrorKind::NotFound.into(),
            },
            HashError::PermissionDenied(path) => Self::Open {
                path,
                source: std::io::ErrorKind::PermissionDenied.into(),
            },
            HashError::Io { path, source } => Self::Read { path, source },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error for the given path.
    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
