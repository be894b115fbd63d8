//! dupfinder - Byte-for-byte duplicate file finder
//!
//! Collects every regular file under a set of directories, groups files
//! whose contents are identical, reports the groups, and can write them to
//! a log file or move the redundant copies to the trash.
//!
//! The first file of each group (in walk order) is its representative and
//! is never deleted.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod scanner;

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::delete::{delete_redundant, BatchDeleteResult, DeleteConfig, PrintingReporter};
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, LogWriter, TextOutput};
use crate::progress::Progress;
use crate::prompt::{confirm, PathCollector, PromptOutcome};
use crate::scanner::WalkerConfig;

const LOG_QUESTION: &str = "Create log?";
const DELETE_QUESTION: &str = "Safely remove duplicates?";

/// Run dupfinder on the process console.
///
/// # Errors
///
/// Returns an error for fatal problems: an invalid configuration, a root
/// that is not a directory, or a report/log that cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let color = !cli.no_color && io::stdout().is_terminal();
    if !color {
        yansi::disable();
    }

    let stdin = io::stdin();
    run_with_io(&cli, stdin.lock(), io::stdout(), color)
}

/// Run dupfinder reading answers from `input` and writing to `output`.
///
/// Without paths on the command line the interactive prompt collects them
/// first and the log and delete questions are asked after the report.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with_io<R, W>(cli: &Cli, mut input: R, mut output: W, color: bool) -> Result<ExitCode>
where
    R: BufRead,
    W: Write + Send,
{
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.merge_cli(cli);
    log::debug!("Effective configuration: {:?}", config);

    let interactive = cli.is_interactive();
    let paths = if interactive {
        let mut collector = PathCollector::new(&mut input, &mut output);
        match collector.collect().context("Failed to read paths")? {
            PromptOutcome::Paths(paths) => paths,
            PromptOutcome::Exit => return Ok(ExitCode::Success),
        }
    } else {
        cli.paths.clone()
    };

    let progress = Arc::new(Progress::with_accessible(cli.quiet, config.plain_progress));
    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_strategy(config.strategy)
            .with_walker_config(WalkerConfig::new(config.follow_symlinks))
            .with_progress_callback(progress),
    );
    let (groups, summary) = finder.find_duplicates_in_paths(&paths)?;
    log::info!(
        "Scanned {} file(s) totalling {} in {:.2?}; {:.1}% reclaimable",
        summary.total_files,
        summary.total_size_display(),
        summary.scan_duration,
        summary.wasted_percentage()
    );

    match cli.output {
        OutputFormat::Text => TextOutput::new(&groups, &summary)
            .with_listing_threshold(config.listing_threshold)
            .with_color(color)
            .write_to(&mut output)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&groups, &summary, ExitCode::Success)
            .write_to(&mut output, true)
            .context("Failed to write JSON output")?,
        OutputFormat::Csv => CsvOutput::new(&groups)
            .write_to(&mut output)
            .context("Failed to write CSV output")?,
    }

    if groups.is_empty() {
        return Ok(ExitCode::Success);
    }

    let create_log = if interactive {
        confirm(&mut input, &mut output, LOG_QUESTION)?
    } else {
        cli.log
    };
    if create_log {
        let path = LogWriter::new(config.log_dir_or_current())
            .write(&groups)
            .context("Failed to create log")?;
        if cli.output == OutputFormat::Text {
            writeln!(output, "Log written to {}", path.display())?;
        }
    }

    let remove = if interactive {
        confirm(&mut input, &mut output, DELETE_QUESTION)?
    } else if cli.delete && cli.yes {
        true
    } else if cli.delete {
        // Keep machine-readable output clean
        if cli.output == OutputFormat::Text {
            confirm(&mut input, &mut output, DELETE_QUESTION)?
        } else {
            confirm(&mut input, io::stderr(), DELETE_QUESTION)?
        }
    } else {
        false
    };
    if remove {
        let delete_config = DeleteConfig {
            permanent: config.permanent,
            ..DeleteConfig::default()
        };
        let result = if cli.output == OutputFormat::Text {
            remove_duplicates(&groups, &delete_config, &mut output)
        } else {
            remove_duplicates(&groups, &delete_config, io::stderr())
        };
        if !result.all_succeeded() {
            log::warn!("{}", result.summary());
        }
    } else {
        log::debug!("Leaving duplicates in place");
    }

    output.flush()?;
    Ok(ExitCode::Success)
}

fn remove_duplicates<W: Write + Send>(
    groups: &[DuplicateGroup],
    config: &DeleteConfig,
    out: W,
) -> BatchDeleteResult {
    let reporter = PrintingReporter::new(out);
    delete_redundant(groups, config, Some(&reporter))
}
