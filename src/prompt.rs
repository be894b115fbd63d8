//! Interactive console prompts.
//!
//! # Overview
//!
//! [`PathCollector`] reads directory paths and slash commands line by line
//! until the user continues or exits. [`confirm`] asks a yes/no question.
//! Both take their reader and writer explicitly, so the same code drives a
//! terminal or an in-memory script.
//!
//! Added paths are kept free of nesting: a directory inside an already
//! added one is rejected, and adding a parent replaces every added child.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::prompt::{PathCollector, PromptOutcome};
//!
//! let stdin = std::io::stdin();
//! let mut collector = PathCollector::new(stdin.lock(), std::io::stdout());
//! match collector.collect().unwrap() {
//!     PromptOutcome::Paths(paths) => println!("scanning {:?}", paths),
//!     PromptOutcome::Exit => {}
//! }
//! ```

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use thiserror::Error;

use crate::scanner::path_utils::{absolute_normalized, is_within};

const HELP: &[&str] = &[
    "Enter /list to list all paths that are added.",
    "Enter /continue to start searching.",
    "Enter /help to display this help.",
    "Enter /remove PATH to remove path from list.",
    "Enter /clear to clear screen.",
    "Enter /exit to exit.",
];

/// How the path prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The user continued with these directories.
    Paths(Vec<PathBuf>),
    /// The user asked to exit, or input ended.
    Exit,
}

/// A line that could not be added as a directory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Nothing exists at the path.
    #[error("Given path does not exist.")]
    NotFound(PathBuf),

    /// The path exists but is not a directory.
    #[error("Enter a directory path.")]
    NotADirectory(PathBuf),
}

/// Result of adding a valid directory to a [`PathList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The directory was appended.
    Added(PathBuf),
    /// The same directory was already present.
    AlreadyAdded,
    /// An added directory already contains the new one.
    Covered {
        /// The rejected directory
        path: PathBuf,
        /// The added directory containing it
        parent: PathBuf,
    },
    /// The new directory contains added ones, which it replaced.
    Replaced {
        /// The new directory
        path: PathBuf,
        /// Directories it replaced
        children: Vec<PathBuf>,
    },
}

/// Ordered set of directories without duplicates or nesting.
#[derive(Debug, Clone, Default)]
pub struct PathList {
    paths: Vec<PathBuf>,
}

impl PathList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Added directories, in the order they were added.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Whether nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Validate `raw` and add it as an absolute, normalized directory.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if `raw` does not name an existing directory.
    pub fn add(&mut self, raw: &str) -> Result<AddOutcome, PathError> {
        let path = validate_directory(raw)?;

        if self.paths.contains(&path) {
            return Ok(AddOutcome::AlreadyAdded);
        }

        if let Some(parent) = self.paths.iter().find(|p| is_within(&path, p)) {
            return Ok(AddOutcome::Covered {
                path: path.clone(),
                parent: parent.clone(),
            });
        }

        let (children, kept): (Vec<PathBuf>, Vec<PathBuf>) = self
            .paths
            .drain(..)
            .partition(|p| is_within(p, &path));
        self.paths = kept;
        self.paths.push(path.clone());

        if children.is_empty() {
            Ok(AddOutcome::Added(path))
        } else {
            Ok(AddOutcome::Replaced { path, children })
        }
    }

    /// Remove `raw`, given either as typed when added or in any form that
    /// resolves to the same directory. Returns whether it was present.
    pub fn remove(&mut self, raw: &str) -> bool {
        let target = absolute_normalized(Path::new(raw)).unwrap_or_else(|_| PathBuf::from(raw));
        match self.paths.iter().position(|p| *p == target) {
            Some(idx) => {
                self.paths.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Consume the list.
    #[must_use]
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

fn validate_directory(raw: &str) -> Result<PathBuf, PathError> {
    let given = PathBuf::from(raw);
    let metadata = fs::metadata(&given).map_err(|_| PathError::NotFound(given.clone()))?;
    if !metadata.is_dir() {
        return Err(PathError::NotADirectory(given));
    }
    absolute_normalized(&given).map_err(|_| PathError::NotFound(given))
}

/// Line-oriented path prompt over explicit input and output.
pub struct PathCollector<R, W> {
    reader: R,
    writer: W,
    paths: PathList,
}

impl<R: BufRead, W: Write> PathCollector<R, W> {
    /// Create a collector reading commands from `reader`.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            paths: PathList::new(),
        }
    }

    /// Run the prompt until `/continue`, `/exit`, or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the console fails.
    pub fn collect(&mut self) -> io::Result<PromptOutcome> {
        self.clear_screen()?;
        self.print_help()?;

        loop {
            writeln!(self.writer)?;
            write!(self.writer, "Enter path: ")?;
            self.writer.flush()?;

            let Some(line) = read_line(&mut self.reader)? else {
                log::debug!("Input closed at path prompt");
                writeln!(self.writer)?;
                return Ok(PromptOutcome::Exit);
            };

            match line.as_str() {
                "/list" => self.list()?,
                "/continue" => {
                    if self.paths.is_empty() {
                        writeln!(self.writer, "Add at least one path to continue.")?;
                    } else {
                        let paths = std::mem::take(&mut self.paths).into_paths();
                        log::info!("Collected {} path(s)", paths.len());
                        return Ok(PromptOutcome::Paths(paths));
                    }
                }
                "/help" => self.print_help()?,
                "/clear" => self.clear_screen()?,
                "/exit" => return Ok(PromptOutcome::Exit),
                _ => match line.strip_prefix("/remove ") {
                    Some(target) => self.remove(target)?,
                    None => self.add(&line)?,
                },
            }
        }
    }

    /// Consume the collector and return the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn list(&mut self) -> io::Result<()> {
        if self.paths.is_empty() {
            return writeln!(self.writer, "No path added.");
        }
        for path in self.paths.paths() {
            writeln!(self.writer, "{}", path.display())?;
        }
        Ok(())
    }

    fn remove(&mut self, target: &str) -> io::Result<()> {
        if self.paths.remove(target) {
            writeln!(self.writer, "Removed successfully.")
        } else {
            writeln!(self.writer, "\"{}\" is not added.", target)
        }
    }

    fn add(&mut self, raw: &str) -> io::Result<()> {
        match self.paths.add(raw) {
            Ok(AddOutcome::Added(path)) => {
                log::debug!("Added {}", path.display());
                writeln!(self.writer, "Added successfully.")
            }
            Ok(AddOutcome::AlreadyAdded) => writeln!(self.writer, "Path is already added."),
            Ok(AddOutcome::Covered { path, parent }) => writeln!(
                self.writer,
                "\"{}\" is covered by parent directory \"{}\"",
                path.display(),
                parent.display()
            ),
            Ok(AddOutcome::Replaced { path, children }) => {
                for child in children {
                    writeln!(
                        self.writer,
                        "\"{}\" is replaced with parent directory \"{}\"",
                        child.display(),
                        path.display()
                    )?;
                }
                Ok(())
            }
            Err(e) => writeln!(self.writer, "{}", e),
        }
    }

    fn print_help(&mut self) -> io::Result<()> {
        for line in HELP {
            writeln!(self.writer, "{}", line)?;
        }
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        execute!(self.writer, Clear(ClearType::All), MoveTo(0, 0))
    }
}

/// Ask a yes/no question until the answer is `y`/`Y` or `n`/`N`.
///
/// End of input counts as "no".
///
/// # Errors
///
/// Returns an error if reading or writing the console fails.
///
/// # Example
///
/// ```
/// use dupfinder::prompt::confirm;
///
/// let mut out = Vec::new();
/// let yes = confirm(&b"maybe\nY\n"[..], &mut out, "Create log?").unwrap();
/// assert!(yes);
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "Create log? (y/n): Create log? (y/n): "
/// );
/// ```
pub fn confirm<R: BufRead, W: Write>(mut reader: R, mut writer: W, question: &str) -> io::Result<bool> {
    loop {
        write!(writer, "{} (y/n): ", question)?;
        writer.flush()?;

        match read_line(&mut reader)?.as_deref() {
            Some("y" | "Y") => return Ok(true),
            Some("n" | "N") => return Ok(false),
            Some(_) => continue,
            None => {
                writeln!(writer)?;
                return Ok(false);
            }
        }
    }
}

/// One line without its terminator, or `None` at end of input.
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
