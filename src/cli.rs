//! Command-line interface definitions for dupfinder.
//!
//! All arguments are defined with the clap derive API. Without a path the
//! tool starts the interactive path prompt.
//!
//! # Example
//!
//! ```bash
//! # Interactive session
//! dupfinder
//!
//! # Scan two directories and print the report
//! dupfinder ~/Photos /mnt/backup/Photos
//!
//! # Machine-readable output
//! dupfinder ~/Downloads --output json
//!
//! # Remove redundant copies without asking
//! dupfinder ~/Downloads --delete --yes
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::ComparisonStrategy;

/// Find groups of byte-identical files.
///
/// Every file under the given directories is compared byte for byte with
/// every other file. Groups are reported, optionally logged, and redundant
/// copies can be moved to the trash.
#[derive(Debug, Parser)]
#[command(name = "dupfinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan (omit to enter them interactively)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Maximum number of groups listed individually in the text report
    #[arg(long, value_name = "N")]
    pub listing_threshold: Option<usize>,

    /// How files are compared
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub strategy: Option<StrategyArg>,

    /// Follow symbolic links during scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Write the groups to a log_<timestamp>.txt file
    #[arg(long)]
    pub log: bool,

    /// Directory for log files (default: current directory)
    #[arg(long, value_name = "DIR", requires = "log")]
    pub log_dir: Option<PathBuf>,

    /// Remove every copy except the first file of each group
    #[arg(long)]
    pub delete: bool,

    /// Delete permanently instead of moving to the trash
    ///
    /// Warning: Files cannot be recovered after permanent deletion.
    #[arg(long, requires = "delete")]
    pub permanent: bool,

    /// Skip the confirmation before deleting
    #[arg(short = 'y', long, requires = "delete")]
    pub yes: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show progress as plain percentage lines instead of a bar
    #[arg(long)]
    pub plain_progress: bool,
}

impl Cli {
    /// Whether the paths are entered at the prompt.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Comparison strategy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Compare every pair of files byte by byte
    Pairwise,
    /// Narrow candidates by size and BLAKE3 digest, then compare bytes
    Bucketed,
}

impl From<StrategyArg> for ComparisonStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Pairwise => ComparisonStrategy::Pairwise,
            StrategyArg::Bucketed => ComparisonStrategy::Bucketed,
        }
    }
}
