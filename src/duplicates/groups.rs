//! Duplicate groups and size bucketing.
//!
//! # Overview
//!
//! A [`DuplicateGroup`] is an ordered list of byte-identical files. The first
//! file is the representative (the earliest one encountered during the walk);
//! every other file is a redundant copy.
//!
//! [`bucket_by_size`] is the first filter of the bucketed comparison
//! strategy: files with different sizes can never be identical, so only
//! same-size buckets with two or more members need their content read.
//!
//! # Example
//!
//! ```
//! use dupfinder::scanner::FileEntry;
//! use dupfinder::duplicates::bucket_by_size;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/a.txt"), 1024, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/b.txt"), 2048, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/c.txt"), 1024, SystemTime::now()),
//! ];
//!
//! let (buckets, stats) = bucket_by_size(&files);
//! assert_eq!(buckets, vec![vec![0, 2]]);
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::FileEntry;

/// Confirmed group of byte-identical files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Member files in encounter order; `files[0]` is the representative
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// The first entry becomes the representative.
    #[must_use]
    pub fn new(files: Vec<FileEntry>) -> Self {
        debug_assert!(files.len() >= 2, "a duplicate group needs two members");
        Self { files }
    }

    /// The file that is kept when redundant copies are removed.
    #[must_use]
    pub fn representative(&self) -> &FileEntry {
        &self.files[0]
    }

    /// Every member except the representative.
    #[must_use]
    pub fn redundant(&self) -> &[FileEntry] {
        self.files.get(1..).unwrap_or(&[])
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Size in bytes of one copy.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.files.first().map_or(0, |f| f.size)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.redundant().iter().map(|f| f.size).sum()
    }

    /// Number of duplicate copies (total - 1 representative).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from size bucketing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of empty files encountered
    pub empty_files: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size bucketing.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Bucket files by exact size.
///
/// Returns buckets of indices into `files`. Only buckets with two or more
/// members are returned. Each bucket lists indices in ascending order and
/// the buckets themselves are ordered by their first index, so encounter
/// order survives the bucketing. Empty files form a bucket like any other
/// size.
#[must_use]
pub fn bucket_by_size(files: &[FileEntry]) -> (Vec<Vec<usize>>, GroupingStats) {
    let mut stats = GroupingStats::default();
    let mut slots: HashMap<u64, usize> = HashMap::new();
    let mut buckets: Vec<Vec<usize>> = Vec::new();

    for (index, file) in files.iter().enumerate() {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }

        let slot = *slots.entry(file.size).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(index);
    }

    stats.unique_sizes = buckets.len();

    let buckets: Vec<Vec<usize>> = buckets
        .into_iter()
        .filter(|bucket| {
            if bucket.len() == 1 {
                stats.eliminated_unique += 1;
                log::trace!("Eliminated unique size: {}", files[bucket[0]].path.display());
                false
            } else {
                stats.potential_duplicates += bucket.len();
                true
            }
        })
        .collect();

    log::debug!(
        "Size bucketing: {} files -> {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (buckets, stats)
}
