//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

use crate::cli::EngineArgs;
use shortform_core::EngineConfig;

/// Module containing the implementation of the `convert` command.
/// This command turns a landscape video into a vertical Shorts video.
pub mod convert;

/// Module containing the implementation of the `submit` command.
/// This command validates a conversion form submission.
pub mod submit;

/// Builds the engine configuration from the shared engine flags.
#[must_use]
pub fn engine_config(args: &EngineArgs) -> EngineConfig {
    let mut config = EngineConfig::new().with_auto_download(args.auto_download);
    if let Some(path) = &args.ffmpeg_path {
        config = config.with_ffmpeg_path(path);
    }
    if let Some(dir) = &args.scratch_dir {
        config = config.with_scratch_dir(dir);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_engine_config_from_args() {
        let args = EngineArgs {
            ffmpeg_path: Some(PathBuf::from("/usr/bin/ffmpeg")),
            auto_download: true,
            scratch_dir: None,
        };
        let config = engine_config(&args);
        assert_eq!(config.ffmpeg_path, Some(PathBuf::from("/usr/bin/ffmpeg")));
        assert!(config.auto_download);
        assert_eq!(config.scratch_dir, None);
    }
}
