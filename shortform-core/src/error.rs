// ============================================================================
// shortform-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for shortform-core
//
// This module defines the error type used throughout the library. Engine
// loading and conversion failures surface to users as fixed, human-readable
// messages; the lower-level causes (missing binaries, failed commands, I/O)
// have their own variants so they can be logged before being wrapped.
//
// KEY COMPONENTS:
// - CoreError: Enum of all error kinds
// - CoreResult: Result alias used by every fallible operation
// - Helper constructors for command execution failures

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::process::ExitStatus;

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors produced by the shortform core library.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Initialization ----
    /// The engine could not be fetched or bootstrapped. The message is fixed;
    /// the underlying cause is logged when this error is produced.
    #[error("Failed to load the video engine")]
    EngineLoad,

    #[error("Video engine bootstrap failed: {0}")]
    EngineBootstrap(#[source] anyhow::Error),

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    // ---- Conversion ----
    #[error("The video engine is not loaded")]
    NotLoaded,

    #[error("No input file selected")]
    NoInputSelected,

    #[error("No converted video is available")]
    NoOutput,

    #[error("Conversion failed: {0}")]
    Conversion(String),

    #[error("Invalid conversion options: {0}")]
    InvalidOptions(String),

    // ---- Engine workspace ----
    #[error("Invalid engine file name: '{0}'")]
    InvalidFileName(String),

    #[error("File not found in engine workspace: {0}")]
    FileNotFound(String),

    // ---- Command execution ----
    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed while waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{0}' failed with status {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    // ---- General ----
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for shortform-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// ============================================================================
// HELPER CONSTRUCTORS
// ============================================================================

pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_load_message_is_fixed() {
        assert_eq!(
            CoreError::EngineLoad.to_string(),
            "Failed to load the video engine"
        );
    }

    #[test]
    fn test_conversion_message_has_prefix() {
        let err = CoreError::Conversion("exit status 1".to_string());
        assert_eq!(err.to_string(), "Conversion failed: exit status 1");
    }

    #[test]
    fn test_io_error_converts() {
        let err: CoreError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
