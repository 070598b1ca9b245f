// shortform-core/tests/sidecar_tests.rs
//
// Runs the ffmpeg-backed engine against a shell script standing in for
// ffmpeg, so failure reporting is checked without a real binary.

#![cfg(unix)]

use shortform_core::{ConversionManager, ConversionOptions, CoreError, EngineConfig, InputFile};
use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FAILING_FFMPEG: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
    echo "ffmpeg version 6.1-test Copyright (c) 2000-2023 the FFmpeg developers"
    exit 0
fi
echo "[error] input.mp4: Invalid data found when processing input" >&2
exit 1
"#;

fn install_script(dir: &Path, body: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join("ffmpeg");
    fs::write(&path, body)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

#[test]
fn test_failed_ffmpeg_run_reports_its_error_output() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let ffmpeg = install_script(dir.path(), FAILING_FFMPEG)?;
    let scratch = dir.path().join("scratch");
    fs::create_dir(&scratch)?;

    let mut manager = ConversionManager::new(
        EngineConfig::new()
            .with_ffmpeg_path(ffmpeg)
            .with_scratch_dir(&scratch),
    );
    manager.load()?;

    let input = InputFile::new("landscape.mp4", b"not a video".to_vec());
    let err = manager
        .convert_to_shorts(&input, &ConversionOptions::default())
        .unwrap_err();

    assert!(matches!(err, CoreError::Conversion(_)));
    let message = err.to_string();
    assert!(message.starts_with("Conversion failed: "), "{message}");
    assert!(message.contains("Invalid data found"), "{message}");
    assert!(manager.is_loaded());
    Ok(())
}
