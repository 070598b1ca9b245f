//! Temporary directory management.
//!
//! The engine workspace lives in a `tempfile::TempDir`, so it is removed when
//! the engine is dropped, including on error paths.

use crate::error::CoreResult;
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Creates a workspace directory with prefix under `base` (or the system temp
/// dir). Auto-cleaned when dropped.
pub fn create_workspace(base: Option<&Path>, prefix: &str) -> CoreResult<TempDir> {
    let mut builder = TempFileBuilder::new();
    builder.prefix(prefix);

    match base {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Ok(builder.tempdir_in(dir)?)
        }
        None => Ok(builder.tempdir()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_created_under_base_and_removed_on_drop() {
        let base = tempfile::tempdir().unwrap();
        let nested = base.path().join("scratch");

        let workspace = create_workspace(Some(&nested), "shortform_").unwrap();
        let path = workspace.path().to_path_buf();
        assert!(path.starts_with(&nested));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("shortform_"));

        drop(workspace);
        assert!(!path.exists());
    }
}
