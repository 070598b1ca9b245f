//! Input and output media buffers.

use crate::config::{DOWNLOAD_FILE_NAME, OUTPUT_MIME_TYPE};
use crate::error::{CoreError, CoreResult};

use std::fs;
use std::path::{Path, PathBuf};

/// A video selected for conversion, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let mime_type = guess_mime_type(Path::new(&name));
        Self {
            name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let name = path
            .file_name()
            .ok_or_else(|| {
                CoreError::PathError(format!("Failed to get filename for {}", path.display()))
            })?
            .to_string_lossy()
            .into_owned();
        let bytes = fs::read(path)?;
        Ok(Self::new(name, bytes))
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// The converted video returned by a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedVideo {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl ConvertedVideo {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: OUTPUT_MIME_TYPE,
        }
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Writes the video to `dest`, or to `dest/shorts-video.mp4` when `dest`
    /// is an existing directory. Returns the path written.
    pub fn save(&self, dest: &Path) -> CoreResult<PathBuf> {
        let target = if dest.is_dir() {
            dest.join(DOWNLOAD_FILE_NAME)
        } else {
            if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            dest.to_path_buf()
        };

        fs::write(&target, &self.bytes)?;
        log::info!("Saved {} bytes to {}", self.bytes.len(), target.display());
        Ok(target)
    }
}

/// MIME type from the file extension, `application/octet-stream` when unknown.
#[must_use]
pub fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(guess_mime_type(Path::new("thumb.png")), "image/png");
        assert_eq!(guess_mime_type(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_input_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("landscape.mp4");
        fs::write(&path, b"not really a video").unwrap();

        let input = InputFile::from_path(&path).unwrap();
        assert_eq!(input.name, "landscape.mp4");
        assert_eq!(input.mime_type, "video/mp4");
        assert_eq!(input.size(), 18);
    }

    #[test]
    fn test_input_file_missing() {
        let err = InputFile::from_path(Path::new("/no/such/dir/clip.mp4")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn test_save_into_directory_uses_download_name() {
        let dir = tempfile::tempdir().unwrap();
        let video = ConvertedVideo::new(vec![1, 2, 3]);

        let written = video.save(dir.path()).unwrap();
        assert_eq!(written, dir.path().join("shorts-video.mp4"));
        assert_eq!(fs::read(&written).unwrap(), vec![1, 2, 3]);
        assert_eq!(video.mime_type, "video/mp4");
    }

    #[test]
    fn test_save_to_explicit_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("vertical.mp4");

        let written = ConvertedVideo::new(vec![9]).save(&target).unwrap();
        assert_eq!(written, target);
        assert!(target.is_file());
    }
}
