// ============================================================================
// shortform-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and Run Log Dispatch
//
// The core library logs through the `log` facade. This module installs a
// fern dispatcher that sends warnings and errors to stderr (everything from
// debug up with --verbose) and, when a log directory is configured, writes a
// full debug log of the run to `shortform_<timestamp>.log`.
//
// KEY COMPONENTS:
// - init_logging: Installs the global logger
// - get_timestamp: Timestamp used in log file names

use crate::config::LOG_FILE_PREFIX;
use crate::error::{CliErrorContext, CliResult};

use log::LevelFilter;
use owo_colors::OwoColorize;
use shortform_core::CoreError;

use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("shortform_{}.log", shortform_cli::logging::get_timestamp());
/// assert!(log_filename.ends_with(".log"));
/// ```
#[must_use]
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Console verbosity for the given flag.
#[must_use]
pub fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs the global logger. Returns the run log path when one is written.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let console = fern::Dispatch::new()
        .level(console_level(verbose))
        .format(|out, message, record| {
            let level = match record.level() {
                log::Level::Error => "ERROR".bright_red().bold().to_string(),
                log::Level::Warn => "WARN ".yellow().to_string(),
                log::Level::Info => "INFO ".green().to_string(),
                log::Level::Debug => "DEBUG".blue().to_string(),
                log::Level::Trace => "TRACE".magenta().to_string(),
            };
            out.finish(format_args!("{level} {message}"));
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Debug)
        .chain(console);

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).cli_with_context(|| {
                format!("Failed to create log directory '{}'", dir.display())
            })?;
            let path = dir.join(format!("{LOG_FILE_PREFIX}_{}.log", get_timestamp()));
            let file = fern::log_file(&path)
                .cli_with_context(|| format!("Failed to open log file '{}'", path.display()))?;

            dispatch = dispatch.chain(
                fern::Dispatch::new()
                    .level(LevelFilter::Debug)
                    .format(|out, message, record| {
                        out.finish(format_args!(
                            "{} {:<5} [{}] {}",
                            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                            record.level(),
                            record.target(),
                            message
                        ));
                    })
                    .chain(file),
            );
            Some(path)
        }
        None => None,
    };

    dispatch
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))?;

    if let Some(path) = &log_path {
        log::debug!("Run log: {}", path.display());
    }
    Ok(log_path)
}
