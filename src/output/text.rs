//! Human-readable console report.
//!
//! The report always starts with a one-line count of groups and redundant
//! files, then lists every group unless there are too many of them to be
//! useful on a terminal:
//!
//! ```text
//! found 2 group(s) & 3 duplicate(s).
//!
//! [Group 1]
//! /photos/a.jpg
//! /backup/a.jpg
//!
//! [Group 2]
//! /photos/b.jpg
//! /backup/b.jpg
//! /backup/old/b.jpg
//!
//! 12.3 KiB reclaimable
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::duplicates::DuplicateFinder;
//! use dupfinder::output::text::TextOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! TextOutput::new(&groups, &summary)
//!     .with_listing_threshold(30)
//!     .write_to(&mut std::io::stdout())
//!     .unwrap();
//! ```

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Default maximum number of groups that are listed individually.
pub const DEFAULT_LISTING_THRESHOLD: usize = 15;

/// Console report formatter.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
    listing_threshold: usize,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a new report without colors and the default listing threshold.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &'a ScanSummary) -> Self {
        Self {
            groups,
            summary,
            listing_threshold: DEFAULT_LISTING_THRESHOLD,
            color: false,
        }
    }

    /// Set the maximum number of groups that are listed individually.
    #[must_use]
    pub fn with_listing_threshold(mut self, threshold: usize) -> Self {
        self.listing_threshold = threshold;
        self
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Whether individual groups will be listed.
    #[must_use]
    pub fn lists_groups(&self) -> bool {
        self.groups.len() <= self.listing_threshold
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let duplicates: usize = self.groups.iter().map(DuplicateGroup::duplicate_count).sum();
        let headline = format!(
            "found {} group(s) & {} duplicate(s).",
            self.groups.len(),
            duplicates
        );
        writeln!(writer, "{}", self.paint_headline(&headline))?;
        writeln!(writer)?;

        if self.lists_groups() {
            for (idx, group) in self.groups.iter().enumerate() {
                let label = format!("[Group {}]", idx + 1);
                writeln!(writer, "{}", self.paint_label(&label))?;
                for file in &group.files {
                    writeln!(writer, "{}", file.path.display())?;
                }
                writeln!(writer)?;
            }
        } else {
            log::info!(
                "{} groups exceed the listing threshold of {}",
                self.groups.len(),
                self.listing_threshold
            );
        }

        if self.summary.reclaimable_space > 0 {
            writeln!(
                writer,
                "{} reclaimable",
                self.summary.reclaimable_display()
            )?;
        }

        let errors = self.summary.error_count();
        if errors > 0 {
            let note = format!("{} file(s) skipped due to errors", errors);
            writeln!(writer, "{}", self.paint_warning(&note))?;
        }

        Ok(())
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    fn paint_headline(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_label(&self, text: &str) -> String {
        if self.color {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}
