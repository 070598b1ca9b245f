// ============================================================================
// shortform-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Engine Configuration and Default Constants
//
// This module defines the configuration handed to the video engine when it is
// loaded, together with the fixed names and default conversion parameters
// used throughout the library.
//
// USAGE:
// Instances of EngineConfig are created by consumers of the library (like
// shortform-cli) and passed to ConversionManager::new.

// ---- Standard library imports ----
use std::path::PathBuf;

// ============================================================================
// ENGINE WORKSPACE NAMES
// ============================================================================

/// Name under which the input video is written into the engine workspace.
pub const INPUT_FILE_NAME: &str = "input.mp4";

/// Name of the file the engine is asked to produce.
pub const OUTPUT_FILE_NAME: &str = "output.mp4";

/// MIME type attached to every converted video.
pub const OUTPUT_MIME_TYPE: &str = "video/mp4";

/// File name used when a converted video is downloaded into a directory.
pub const DOWNLOAD_FILE_NAME: &str = "shorts-video.mp4";

// ============================================================================
// DEFAULT CONVERSION PARAMETERS
// ============================================================================

/// Default output width of a Shorts video.
pub const DEFAULT_WIDTH: u32 = 720;

/// Default output height of a Shorts video.
pub const DEFAULT_HEIGHT: u32 = 1280;

/// Default x264/x265 constant rate factor. Lower values give higher quality.
pub const DEFAULT_CRF: u8 = 23;

/// Highest CRF accepted by libx264 and libx265.
pub const MAX_CRF: u8 = 51;

pub const DEFAULT_AUDIO_BITRATE: &str = "128k";

pub const DEFAULT_PADDING_COLOR: &str = "black";

// ---- Crop profile ----

pub const CROP_PROFILE_WIDTH: u32 = 1080;
pub const CROP_PROFILE_HEIGHT: u32 = 1920;
pub const CROP_PROFILE_CRF: u8 = 25;

/// Maximum length of a Shorts video in the crop profile, in seconds.
pub const CROP_PROFILE_MAX_DURATION_SECS: u32 = 60;

// ============================================================================
// ENGINE CONFIGURATION
// ============================================================================

/// Configuration used when the engine is loaded.
///
/// # Examples
///
/// ```rust
/// use shortform_core::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_ffmpeg_path("/usr/local/bin/ffmpeg")
///     .with_auto_download(false);
/// assert!(!config.auto_download);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Explicit ffmpeg binary. When unset the installed binary is used.
    pub ffmpeg_path: Option<PathBuf>,

    /// Download an ffmpeg build when none is installed.
    pub auto_download: bool,

    /// Parent directory for the engine workspace (system temp dir if unset).
    pub scratch_dir: Option<PathBuf>,
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_auto_download(mut self, enabled: bool) -> Self {
        self.auto_download = enabled;
        self
    }

    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.ffmpeg_path, None);
        assert!(!config.auto_download);
        assert_eq!(config.scratch_dir, None);
    }

    #[test]
    fn test_engine_config_builder_chain() {
        let config = EngineConfig::new()
            .with_ffmpeg_path("/opt/ffmpeg/bin/ffmpeg")
            .with_auto_download(true)
            .with_scratch_dir("/tmp/shortform");

        assert_eq!(config.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
        assert!(config.auto_download);
        assert_eq!(config.scratch_dir, Some(PathBuf::from("/tmp/shortform")));
    }
}
