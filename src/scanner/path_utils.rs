//! Unicode path normalization utilities.
//!
//! Paths typed into the interactive prompt are compared against each other
//! to detect duplicates and nesting. This module provides the helpers that
//! make those comparisons stable.
//!
//! # Background
//!
//! macOS uses NFD (Decomposed) normalization for file paths, while Windows
//! and Linux typically use NFC (Composed) normalization. This means the same
//! visual filename can have different byte representations:
//!
//! - NFC: `café` - 'é' is U+00E9 (single code point)
//! - NFD: `café` - 'e' U+0065 + combining acute accent U+0301
//!
//! Without normalization, these would compare as different paths.
//!
//! # Example
//!
//! ```
//! use dupfinder::scanner::path_utils::{is_within, normalize_path_str};
//! use std::path::Path;
//!
//! assert_eq!(normalize_path_str("cafe\u{0301}"), "café");
//! assert!(is_within(Path::new("/a/b/c"), Path::new("/a/b")));
//! assert!(!is_within(Path::new("/a/bc"), Path::new("/a/b")));
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Normalize a path string to NFC (Composed) form.
///
/// # Example
///
/// ```
/// use dupfinder::scanner::path_utils::normalize_path_str;
///
/// let nfd = "cafe\u{0301}.txt"; // NFD form
/// assert_eq!(normalize_path_str(nfd), "café.txt");
/// ```
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Normalize a [`Path`] to NFC form.
///
/// If the path contains invalid UTF-8, returns the original path unchanged.
#[must_use]
pub fn normalize_pathbuf(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(normalize_path_str(s)),
        None => path.to_path_buf(),
    }
}

/// Make a path absolute and lexically clean, then NFC-normalize it.
///
/// `.` components are dropped and `..` pops the previous component, so
/// `/data/photos/../music` and `/data/music` produce the same result.
/// Symbolic links are not resolved.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined for a
/// relative path.
pub fn absolute_normalized(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }

    Ok(normalize_pathbuf(&cleaned))
}

/// Whether `path` is `ancestor` itself or lies somewhere beneath it.
///
/// Comparison is component-wise, so `/a/bc` is not within `/a/b`.
#[must_use]
pub fn is_within(path: &Path, ancestor: &Path) -> bool {
    normalize_pathbuf(path).starts_with(normalize_pathbuf(ancestor))
}
