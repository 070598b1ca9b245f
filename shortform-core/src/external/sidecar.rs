// ============================================================================
// shortform-core/src/external/sidecar.rs
// ============================================================================
//
// SIDECAR ENGINE: Engine Implementation Backed by an FFmpeg Binary
//
// This module implements the Engine trait on top of ffmpeg-sidecar. Loading
// the engine resolves the ffmpeg binary (downloading a build when allowed),
// confirms it runs, and creates a private workspace directory that plays the
// role of the engine's virtual filesystem. Commands run with that workspace
// as their working directory so they address files by plain name.
//
// KEY COMPONENTS:
// - SidecarEngine: The Engine implementation
// - resolve_ffmpeg: Binary lookup and optional download

use super::progress::EngineProgressHandler;
use super::{Engine, EngineEvent, args::output_duration_limit, ensure_plain_file_name};
use crate::config::EngineConfig;
use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
};
use crate::temp_files;

use ffmpeg_sidecar::command::{FfmpegCommand, ffmpeg_is_installed};
use log::{debug, info, warn};
use tempfile::TempDir;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Engine that runs a local ffmpeg binary.
#[derive(Debug, Default)]
pub struct SidecarEngine {
    ffmpeg_path: Option<PathBuf>,
    workspace: Option<TempDir>,
}

impl SidecarEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn loaded_parts(&self) -> CoreResult<(&Path, &Path)> {
        match (&self.ffmpeg_path, &self.workspace) {
            (Some(ffmpeg), Some(workspace)) => Ok((ffmpeg.as_path(), workspace.path())),
            _ => Err(CoreError::NotLoaded),
        }
    }

    fn workspace_file(&self, name: &str) -> CoreResult<PathBuf> {
        ensure_plain_file_name(name)?;
        let (_, workspace) = self.loaded_parts()?;
        Ok(workspace.join(name))
    }
}

impl Engine for SidecarEngine {
    fn load(&mut self, config: &EngineConfig) -> CoreResult<()> {
        let ffmpeg = resolve_ffmpeg(config)?;

        let version = ffmpeg_sidecar::version::ffmpeg_version_with_path(&ffmpeg)
            .map_err(bootstrap_error)?;
        info!("Using ffmpeg {} at {}", version, ffmpeg.display());

        let workspace = temp_files::create_workspace(config.scratch_dir.as_deref(), "shortform_")?;
        debug!("Engine workspace: {}", workspace.path().display());

        self.ffmpeg_path = Some(ffmpeg);
        self.workspace = Some(workspace);
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> CoreResult<()> {
        let path = self.workspace_file(name)?;
        fs::write(&path, data)?;
        debug!("Wrote {} bytes to engine file {}", data.len(), name);
        Ok(())
    }

    fn exec(&mut self, args: &[String], on_event: &mut dyn FnMut(EngineEvent)) -> CoreResult<()> {
        let (ffmpeg, workspace) = self.loaded_parts()?;

        let mut cmd = FfmpegCommand::new_with_path(ffmpeg);
        cmd.args(args);
        cmd.as_inner_mut().current_dir(workspace);
        debug!("Running ffmpeg in {}: {:?}", workspace.display(), args);

        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error("ffmpeg", e))?;

        let mut handler = EngineProgressHandler::new(output_duration_limit(args));
        let events = child.iter().map_err(|e| {
            CoreError::OperationFailed(format!("Failed to read ffmpeg events: {e}"))
        })?;
        for event in events {
            handler.handle_event(event, on_event);
        }

        let status = child.wait().map_err(|e| command_wait_error("ffmpeg", e))?;
        if status.success() {
            Ok(())
        } else {
            Err(command_failed_error(
                "ffmpeg",
                status,
                handler.stderr_buffer().trim(),
            ))
        }
    }

    fn read_file(&mut self, name: &str) -> CoreResult<Vec<u8>> {
        let path = self.workspace_file(name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CoreError::FileNotFound(name.to_string()),
            _ => CoreError::Io(e),
        })
    }

    fn delete_file(&mut self, name: &str) -> CoreResult<()> {
        let path = self.workspace_file(name)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CoreError::FileNotFound(name.to_string()),
            _ => CoreError::Io(e),
        })
    }
}

/// Finds the ffmpeg binary to use.
///
/// Order: the configured path, then an installed ffmpeg (PATH or the
/// sidecar directory next to the executable), then a fresh download when
/// `auto_download` is enabled.
pub fn resolve_ffmpeg(config: &EngineConfig) -> CoreResult<PathBuf> {
    if let Some(path) = &config.ffmpeg_path {
        if path.is_file() {
            return Ok(path.clone());
        }
        warn!("Configured ffmpeg path does not exist: {}", path.display());
        return Err(CoreError::DependencyNotFound(path.display().to_string()));
    }

    if ffmpeg_is_installed() {
        return Ok(ffmpeg_sidecar::paths::ffmpeg_path());
    }

    if !config.auto_download {
        warn!("Dependency 'ffmpeg' not found and auto-download is disabled.");
        return Err(CoreError::DependencyNotFound("ffmpeg".to_string()));
    }

    info!("ffmpeg not found, downloading a static build...");
    ffmpeg_sidecar::download::auto_download().map_err(bootstrap_error)?;
    Ok(ffmpeg_sidecar::paths::ffmpeg_path())
}

fn bootstrap_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::EngineBootstrap(anyhow::anyhow!("{err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unloaded_engine_rejects_file_access() {
        let mut engine = SidecarEngine::new();
        assert!(matches!(engine.write_file("input.mp4", b"data"), Err(CoreError::NotLoaded)));
        assert!(matches!(engine.read_file("output.mp4"), Err(CoreError::NotLoaded)));
        assert!(matches!(engine.exec(&[], &mut |_| {}), Err(CoreError::NotLoaded)));
    }

    #[test]
    fn test_invalid_names_checked_before_load_state() {
        let mut engine = SidecarEngine::new();
        assert!(matches!(
            engine.delete_file("../escape.mp4"),
            Err(CoreError::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_missing_configured_binary() {
        let config = EngineConfig::new().with_ffmpeg_path("/definitely/not/here/ffmpeg");
        assert!(matches!(resolve_ffmpeg(&config), Err(CoreError::DependencyNotFound(_))));
    }

    #[test]
    fn test_load_fails_with_missing_configured_binary() {
        let mut engine = SidecarEngine::new();
        let config = EngineConfig::new().with_ffmpeg_path("/definitely/not/here/ffmpeg");
        assert!(engine.load(&config).is_err());
        assert!(matches!(engine.write_file("input.mp4", b"data"), Err(CoreError::NotLoaded)));
    }
}
