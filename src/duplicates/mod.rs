//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Exact pairwise grouping of byte-identical files
//! - Size and digest bucketing for large file sets
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{
    group_bucketed, group_pairwise, ComparisonStrategy, DuplicateFinder, FinderConfig,
    FinderError, ScanSummary,
};
pub use groups::{bucket_by_size, DuplicateGroup, GroupingStats};
