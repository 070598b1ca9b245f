//! Core library for converting landscape videos into vertical Shorts.
//!
//! A `ConversionManager` owns one video engine (ffmpeg by default), loads it on
//! demand and runs a fixed scale-and-pad (or scale-and-crop) conversion on an
//! in-memory video. A `FormController` layers user-facing state on top, and the
//! `validation` module checks conversion form submissions.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use shortform_core::{
//!     ConversionManager, ConversionOptions, EngineConfig, FormController, InputFile,
//! };
//! use std::path::Path;
//!
//! let config = EngineConfig::new().with_auto_download(true);
//! let mut form = FormController::new(ConversionManager::new(config))
//!     .with_options(ConversionOptions::default());
//!
//! form.select_file(Some(InputFile::from_path(Path::new("landscape.mp4")).unwrap()));
//! form.load_engine().unwrap();
//! form.set_progress_observer(|percent| println!("{percent}%"));
//! form.convert().unwrap();
//! form.download(Path::new(".")).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod form;
pub mod manager;
pub mod media;
pub mod options;
pub mod temp_files;
pub mod utils;
pub mod validation;

// Re-exports for public API
pub use config::{DOWNLOAD_FILE_NAME, EngineConfig};
pub use error::{CoreError, CoreResult};
pub use external::{Engine, EngineEvent, SidecarEngine};
pub use form::{ConversionStatus, FormController, FormState};
pub use manager::{ConversionManager, Listener, ProgressTracker};
pub use media::{ConvertedVideo, InputFile};
pub use options::{AudioCodec, ConversionOptions, FrameMode, Preset, Resolution, VideoCodec};
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};
pub use validation::{
    Field, FieldErrors, FormSubmission, SubmissionResponse, SubmissionSummary, UploadedFile,
    submit_video_conversion, validate_submission,
};

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of a finished conversion, as reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub input: String,
    pub output: PathBuf,
    pub input_size: u64,
    pub output_size: u64,
    pub resolution: Resolution,
    pub frame_mode: FrameMode,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl ConversionReport {
    /// Output size as a percentage of the input size.
    #[must_use]
    pub fn size_ratio_percent(&self) -> f64 {
        if self.input_size == 0 {
            return 0.0;
        }
        self.output_size as f64 / self.input_size as f64 * 100.0
    }
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}
