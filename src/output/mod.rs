//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Plain text for the console
//! - A text log file of the groups
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::duplicates::DuplicateFinder;
//! use dupfinder::output::json::JsonOutput;
//! use dupfinder::error::ExitCode;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&groups, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod log;
pub mod text;

// Re-export main types
pub use self::csv::{CsvOutput, CsvOutputError};
pub use self::json::{JsonOutput, JsonOutputError};
pub use self::log::{render_log, LogError, LogWriter};
pub use self::text::{TextOutput, DEFAULT_LISTING_THRESHOLD};
