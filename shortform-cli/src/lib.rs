// shortform-cli/src/lib.rs
//
// Library portion of the Shortform CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConvertArgs, EngineArgs, SubmitArgs};
pub use commands::convert::run_convert;
pub use commands::submit::run_submit;
pub use error::{CliErrorContext, CliResult};
