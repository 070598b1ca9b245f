// ============================================================================
// shortform-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL ENGINE: Abstraction over the Video Processing Engine
//
// This module encapsulates every interaction with the third-party engine that
// performs the actual transcoding. The rest of the crate only sees the Engine
// trait: load it, put a file into its private workspace, run an argument list,
// read the result back.
//
// KEY COMPONENTS:
// - Engine: Trait describing the engine contract
// - EngineEvent: Log and progress notifications emitted during exec
// - SidecarEngine: Default implementation driving an ffmpeg binary
// - ScriptedEngine: In-memory implementation for tests
// - Argument building for the Shorts filter graph

// ---- Internal crate imports ----
use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains ffmpeg argument and filter graph building
pub mod args;

/// Scripted in-memory engine used by tests
pub mod mocks;

/// Translates ffmpeg-sidecar events into engine events
pub mod progress;

/// Engine implementation backed by an ffmpeg binary via ffmpeg-sidecar
pub mod sidecar;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use args::{VideoFilterChain, build_conversion_args, build_filter_graph};
pub use mocks::ScriptedEngine;
pub use sidecar::SidecarEngine;

// ============================================================================
// ENGINE CONTRACT
// ============================================================================

/// Notification emitted by the engine while a command runs.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// One line of engine output.
    Log(String),
    /// Completion ratio of the running command, nominally 0.0 to 1.0.
    Progress(f64),
}

/// The video processing engine.
///
/// File names passed to the workspace methods are plain names (no directory
/// components); implementations reject anything else with
/// `CoreError::InvalidFileName`.
pub trait Engine {
    /// Fetches and initializes the engine. Called once per instance.
    fn load(&mut self, config: &EngineConfig) -> CoreResult<()>;

    /// Stores `data` in the engine workspace under `name`.
    fn write_file(&mut self, name: &str, data: &[u8]) -> CoreResult<()>;

    /// Runs one command line, delivering events to `on_event` in the order the
    /// engine emits them. Returns once the command has finished.
    fn exec(&mut self, args: &[String], on_event: &mut dyn FnMut(EngineEvent)) -> CoreResult<()>;

    /// Reads `name` back out of the engine workspace.
    fn read_file(&mut self, name: &str) -> CoreResult<Vec<u8>>;

    /// Removes `name` from the engine workspace.
    fn delete_file(&mut self, name: &str) -> CoreResult<()>;
}

/// Rejects workspace names that could escape the workspace.
pub(crate) fn ensure_plain_file_name(name: &str) -> CoreResult<()> {
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);

    if is_plain {
        Ok(())
    } else {
        Err(CoreError::InvalidFileName(name.to_string()))
    }
}
