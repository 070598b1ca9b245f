// ============================================================================
// shortform-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and error context for user-supplied input
//
// The CLI reports everything through shortform-core's CoreError. Failures on
// paths the user typed get a context prefix naming the path.

use shortform_core::{CoreError, CoreResult};

use std::fmt;

/// Result type of every CLI command.
pub type CliResult<T> = CoreResult<T>;

/// Prefixes an error with a lazily built context message.
pub trait CliErrorContext<T> {
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", f(), core_error))
        })
    }
}
