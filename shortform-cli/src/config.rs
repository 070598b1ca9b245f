// shortform-cli/src/config.rs
//
// Defines default configuration constants for the `shortform` CLI, primarily
// related to output locations and terminal presentation.

/// Destination of converted videos when `--output` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Prefix of run log files written to `--log-dir`.
pub const LOG_FILE_PREFIX: &str = "shortform";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} {msg} [{bar:40.cyan/blue}] {percent}% ({elapsed_precise})";
pub const PROGRESS_CHARS: &str = "█▓▒░ ";
