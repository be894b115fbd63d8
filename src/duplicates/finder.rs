//! Duplicate finder implementation.
//!
//! # Overview
//!
//! This module turns a flat, ordered list of files into groups of
//! byte-identical files:
//!
//! - [`group_pairwise`] compares every unclassified file against every later
//!   unclassified file, byte-for-byte. Quadratic, but it never trusts
//!   anything except the file contents.
//! - [`group_bucketed`] first buckets by size, then by BLAKE3 digest, and
//!   runs the same pairwise pass inside each bucket. It returns exactly the
//!   groups [`group_pairwise`] would.
//!
//! [`DuplicateFinder`] ties collection and grouping together and fills a
//! [`ScanSummary`].
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! for group in &groups {
//!     println!("{} copies of {}", group.len(), group.representative().path.display());
//! }
//! println!("Reclaimable: {}", summary.reclaimable_display());
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use bytesize::ByteSize;
use serde::{Deserialize, Serialize};

use super::groups::{bucket_by_size, DuplicateGroup};
use crate::progress::{ProgressCallback, PHASE_COMPARE, PHASE_WALKING};
use crate::scanner::{
    collect_files, files_equal, hash_to_hex, CompareError, FileEntry, Hash, Hasher, ScanError,
    WalkerConfig,
};

/// How candidate files are paired up for comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStrategy {
    /// Compare every file with every later file.
    #[default]
    Pairwise,
    /// Bucket by size and BLAKE3 digest, then compare inside each bucket.
    Bucketed,
}

impl std::fmt::Display for ComparisonStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pairwise => write!(f, "pairwise"),
            Self::Bucketed => write!(f, "bucketed"),
        }
    }
}

/// Classification state of one file during grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Open,
    Grouped,
    Excluded,
}

/// Group files into sets of byte-identical files.
///
/// Files are processed in the given order. Each file that is not already in
/// a group is compared with every later file that is neither grouped nor
/// excluded; all matches form a new group with the outer file first.
/// Files without a match do not appear in the output.
///
/// A file that cannot be read is excluded from all further grouping and its
/// error is returned alongside the groups. When the outer file itself fails
/// its remaining comparisons are abandoned.
///
/// Progress is reported as phase [`PHASE_COMPARE`] with one
/// `on_progress(i + 1, ..)` call per input file, so the last call is always
/// `N` of `N`. An empty input returns immediately without any callback.
///
/// # Example
///
/// ```no_run
/// use dupfinder::duplicates::group_pairwise;
/// use dupfinder::scanner::{collect_files, WalkerConfig};
/// use std::path::PathBuf;
///
/// let (files, _) = collect_files(&[PathBuf::from(".")], &WalkerConfig::default());
/// let (groups, errors) = group_pairwise(&files, None);
/// println!("{} groups, {} unreadable files", groups.len(), errors.len());
/// ```
#[must_use]
pub fn group_pairwise(
    files: &[FileEntry],
    progress: Option<&dyn ProgressCallback>,
) -> (Vec<DuplicateGroup>, Vec<CompareError>) {
    if files.is_empty() {
        return (Vec::new(), Vec::new());
    }

    log::info!("Comparing {} files pairwise", files.len());
    if let Some(callback) = progress {
        callback.on_phase_start(PHASE_COMPARE, files.len());
    }

    let indices: Vec<usize> = (0..files.len()).collect();
    let mut errors = Vec::new();
    let groups = pair_up(files, &indices, &mut errors, |i| {
        if let Some(callback) = progress {
            callback.on_progress(i + 1, &files[i].path.to_string_lossy());
        }
    });

    if let Some(callback) = progress {
        callback.on_phase_end(PHASE_COMPARE);
    }

    let groups = groups
        .into_iter()
        .map(|members| to_group(files, &members))
        .collect::<Vec<_>>();

    log::info!(
        "Pairwise comparison complete: {} groups, {} unreadable files",
        groups.len(),
        errors.len()
    );

    (groups, errors)
}

/// Group files like [`group_pairwise`], reading far fewer file pairs.
///
/// Files are bucketed by their current size (re-read from the file system,
/// like [`files_equal`] does), then same-size files are bucketed by their
/// BLAKE3 digest, and only files sharing a digest are compared
/// byte-for-byte. Groups are returned in the order of their
/// representatives' position in `files`, so the output is identical to the
/// pairwise result for readable files that do not change while they are
/// being grouped.
///
/// Progress is reported as phase [`PHASE_COMPARE`] in bucket order and
/// always ends at `N` of `N`.
#[must_use]
pub fn group_bucketed(
    files: &[FileEntry],
    progress: Option<&dyn ProgressCallback>,
) -> (Vec<DuplicateGroup>, Vec<CompareError>) {
    if files.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let total = files.len();
    log::info!("Comparing {} files with size and digest bucketing", total);
    if let Some(callback) = progress {
        callback.on_phase_start(PHASE_COMPARE, total);
    }

    let mut errors = Vec::new();
    let (live, readable) = current_sizes(files, &mut errors);
    let (size_buckets, stats) = bucket_by_size(&live);
    let hasher = Hasher::new();
    let mut found: Vec<Vec<usize>> = Vec::new();

    // Files with a unique size are settled before any content is read
    let mut done = stats.eliminated_unique;
    let mut reported = 0;

    for bucket in size_buckets {
        let candidates: Vec<usize> = bucket.iter().copied().filter(|&i| readable[i]).collect();
        if candidates.len() > 1 {
            for digest_bucket in bucket_by_digest(&live, &candidates, &hasher, &mut errors) {
                found.extend(pair_up(files, &digest_bucket, &mut errors, |_| {}));
            }
        }

        done += bucket.len();
        if let Some(callback) = progress {
            let last = bucket[bucket.len() - 1];
            callback.on_progress(done, &files[last].path.to_string_lossy());
        }
        reported = done;
    }

    if let Some(callback) = progress {
        if reported != total {
            callback.on_progress(total, &files[total - 1].path.to_string_lossy());
        }
        callback.on_phase_end(PHASE_COMPARE);
    }

    found.sort_by_key(|members| members[0]);
    let groups = found
        .into_iter()
        .map(|members| to_group(files, &members))
        .collect::<Vec<_>>();

    log::info!(
        "Bucketed comparison complete: {} groups, {} unreadable files",
        groups.len(),
        errors.len()
    );

    (groups, errors)
}

/// Copies of `files` carrying their size at grouping time.
///
/// Files that can no longer be stat'ed are recorded as errors and marked
/// unreadable in the returned flags.
fn current_sizes(files: &[FileEntry], errors: &mut Vec<CompareError>) -> (Vec<FileEntry>, Vec<bool>) {
    let mut live = Vec::with_capacity(files.len());
    let mut readable = Vec::with_capacity(files.len());

    for file in files {
        let mut entry = file.clone();
        match fs::metadata(&file.path) {
            Ok(metadata) => {
                if metadata.len() != file.size {
                    log::debug!(
                        "Size of {} changed since the walk ({} -> {})",
                        file.path.display(),
                        file.size,
                        metadata.len()
                    );
                }
                entry.size = metadata.len();
                readable.push(true);
            }
            Err(source) => {
                log::warn!("Skipping unreadable file: {}", file.path.display());
                errors.push(CompareError::Open {
                    path: file.path.clone(),
                    source,
                });
                readable.push(false);
            }
        }
        live.push(entry);
    }

    (live, readable)
}

/// Split a same-size bucket by full-content digest.
///
/// Sub-buckets keep ascending index order and only those with two or more
/// members are returned. Unreadable files are recorded and dropped.
fn bucket_by_digest(
    files: &[FileEntry],
    bucket: &[usize],
    hasher: &Hasher,
    errors: &mut Vec<CompareError>,
) -> Vec<Vec<usize>> {
    // Nothing to read for empty files
    if files[bucket[0]].size == 0 {
        return vec![bucket.to_vec()];
    }

    let mut slots: HashMap<Hash, usize> = HashMap::new();
    let mut sub_buckets: Vec<Vec<usize>> = Vec::new();

    for &index in bucket {
        match hasher.full_hash(&files[index].path) {
            Ok(hash) => {
                log::trace!("{} {}", hash_to_hex(&hash), files[index].path.display());
                let slot = *slots.entry(hash).or_insert_with(|| {
                    sub_buckets.push(Vec::new());
                    sub_buckets.len() - 1
                });
                sub_buckets[slot].push(index);
            }
            Err(e) => {
                log::warn!("Skipping unreadable file: {}", e);
                errors.push(e.into());
            }
        }
    }

    sub_buckets.retain(|sub| sub.len() > 1);
    sub_buckets
}

/// Pairwise grouping over a subset of `files`, given as ascending indices.
///
/// `on_outer` is called once per outer index after that index has been
/// handled, whether it was compared or skipped.
fn pair_up(
    files: &[FileEntry],
    indices: &[usize],
    errors: &mut Vec<CompareError>,
    mut on_outer: impl FnMut(usize),
) -> Vec<Vec<usize>> {
    let mut slots = vec![Slot::Open; indices.len()];
    let mut groups = Vec::new();

    for a in 0..indices.len() {
        let i = indices[a];

        if slots[a] == Slot::Open {
            let mut matches = Vec::new();

            for b in (a + 1)..indices.len() {
                if slots[b] != Slot::Open {
                    continue;
                }
                let j = indices[b];

                match files_equal(&files[i].path, &files[j].path) {
                    Ok(true) => matches.push(b),
                    Ok(false) => {}
                    Err(e) => {
                        log::warn!("Skipping unreadable file: {}", e);
                        let outer_failed = e.path() == files[i].path.as_path();
                        errors.push(e);
                        if outer_failed {
                            slots[a] = Slot::Excluded;
                            break;
                        }
                        slots[b] = Slot::Excluded;
                    }
                }
            }

            if slots[a] == Slot::Open && !matches.is_empty() {
                slots[a] = Slot::Grouped;
                let mut members = vec![i];
                for b in matches {
                    slots[b] = Slot::Grouped;
                    members.push(indices[b]);
                }
                log::debug!(
                    "Group of {} found for {}",
                    members.len(),
                    files[i].path.display()
                );
                groups.push(members);
            }
        }

        on_outer(i);
    }

    groups
}

fn to_group(files: &[FileEntry], members: &[usize]) -> DuplicateGroup {
    DuplicateGroup::new(members.iter().map(|&m| files[m].clone()).collect())
}

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Comparison strategy.
    pub strategy: ComparisonStrategy,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("strategy", &self.strategy)
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the comparison strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ComparisonStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files collected
    pub total_files: usize,
    /// Total size of all collected files in bytes
    pub total_size: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Total number of redundant files (excluding representatives)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing redundant copies
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: std::time::Duration,
    /// Entries skipped while walking
    pub scan_errors: Vec<ScanError>,
    /// Files excluded because they could not be read during comparison
    pub compare_errors: Vec<CompareError>,
}

impl ScanSummary {
    /// Build the counters for a set of files and the groups found in them.
    #[must_use]
    pub fn from_groups(files: &[FileEntry], groups: &[DuplicateGroup]) -> Self {
        Self {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            duplicate_groups: groups.len(),
            duplicate_files: groups.iter().map(DuplicateGroup::duplicate_count).sum(),
            reclaimable_space: groups.iter().map(DuplicateGroup::wasted_space).sum(),
            ..Self::default()
        }
    }

    /// Number of recoverable errors hit during the scan.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.scan_errors.len() + self.compare_errors.len()
    }

    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Duplicate finder that collects files and groups them.
///
/// # Example
///
/// ```no_run
/// use dupfinder::duplicates::{ComparisonStrategy, DuplicateFinder, FinderConfig};
/// use std::path::PathBuf;
///
/// let config = FinderConfig::default().with_strategy(ComparisonStrategy::Bucketed);
/// let finder = DuplicateFinder::new(config);
///
/// let roots = vec![PathBuf::from("/photos"), PathBuf::from("/backup")];
/// let (groups, summary) = finder.find_duplicates_in_paths(&roots).unwrap();
/// println!("found {} group(s) & {} duplicate(s).", groups.len(), summary.duplicate_files);
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under a single root.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the path does not exist or is not a
    /// directory.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        self.find_duplicates_in_paths(&[path.to_path_buf()])
    }

    /// Find all duplicate files under an ordered list of roots.
    ///
    /// Every root is validated before any file is read. Files are collected
    /// in root order, so a file under the first root is always preferred
    /// as the representative over an identical file under a later root.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] for the first root that does not exist or is
    /// not a directory.
    pub fn find_duplicates_in_paths(
        &self,
        paths: &[PathBuf],
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        for path in paths {
            if !path.exists() {
                return Err(FinderError::PathNotFound(path.clone()));
            }
            if !path.is_dir() {
                return Err(FinderError::NotADirectory(path.clone()));
            }
        }

        log::info!("Starting duplicate scan of {} root(s)", paths.len());

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALKING, 0);
        }

        let (files, scan_errors) = collect_files(paths, &self.config.walker_config);

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_message(&format!("found: {} file(s)", files.len()));
            callback.on_phase_end(PHASE_WALKING);
        }

        let (groups, mut summary) = self.find_duplicates_from_files(files);
        summary.scan_errors = scan_errors;
        summary.scan_duration = start_time.elapsed();

        Ok((groups, summary))
    }

    /// Group a pre-collected list of files.
    ///
    /// The list order is the encounter order used to pick representatives.
    #[must_use]
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> (Vec<DuplicateGroup>, ScanSummary) {
        let start_time = Instant::now();
        let progress = self.config.progress_callback.as_deref();

        let (groups, compare_errors) = match self.config.strategy {
            ComparisonStrategy::Pairwise => group_pairwise(&files, progress),
            ComparisonStrategy::Bucketed => group_bucketed(&files, progress),
        };

        let mut summary = ScanSummary::from_groups(&files, &groups);
        summary.compare_errors = compare_errors;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files, {} groups, {} reclaimable",
            summary.total_files,
            summary.duplicate_groups,
            summary.reclaimable_display()
        );

        (groups, summary)
    }
}
