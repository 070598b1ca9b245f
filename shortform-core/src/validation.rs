// ============================================================================
// shortform-core/src/validation.rs
// ============================================================================
//
// FORM VALIDATION: Field Rules for a Conversion Submission
//
// This module validates the fields of a conversion form (title, subtitle,
// video, thumbnail, optional background template) and produces per-field
// error messages. A submission is accepted as a whole or rejected as a whole;
// nothing is processed here.
//
// KEY COMPONENTS:
// - UploadedFile: Name, size and MIME type of a submitted file
// - FormSubmission: The submitted fields
// - FieldErrors: Messages grouped by field
// - submit_video_conversion: Validation plus the JSON-serializable echo

use crate::error::CoreResult;
use crate::media::guess_mime_type;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// LIMITS
// ============================================================================

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_SUBTITLE_CHARS: usize = 100;
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Top-level error message of a rejected submission.
pub const INVALID_SUBMISSION_MESSAGE: &str = "Invalid input data";

// ============================================================================
// TYPES
// ============================================================================

/// Metadata of a submitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub path: Option<PathBuf>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            path: None,
        }
    }

    /// Describes a file on disk without reading it.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            size: metadata.len(),
            mime_type: guess_mime_type(path),
            path: Some(path.to_path_buf()),
        })
    }
}

/// Fields of a conversion form.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    pub title: String,
    pub subtitle: Option<String>,
    pub video_file: Option<UploadedFile>,
    pub thumbnail_image: Option<UploadedFile>,
    pub background_template: Option<UploadedFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Subtitle,
    VideoFile,
    ThumbnailImage,
    BackgroundTemplate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Title => "title",
            Field::Subtitle => "subtitle",
            Field::VideoFile => "videoFile",
            Field::ThumbnailImage => "thumbnailImage",
            Field::BackgroundTemplate => "backgroundTemplate",
        })
    }
}

/// Validation messages grouped by field, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &[String])> {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }
}

/// Echo of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    pub title: String,
    pub has_video_file: bool,
    pub has_thumbnail_image: bool,
}

/// Result of `submit_video_conversion`, serialized as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SubmissionSummary>,
}

// ============================================================================
// RULES
// ============================================================================

struct FileRules {
    mime_prefix: &'static str,
    max_bytes: u64,
    missing: &'static str,
    empty: &'static str,
    wrong_type: &'static str,
    too_large: &'static str,
}

const VIDEO_RULES: FileRules = FileRules {
    mime_prefix: "video/",
    max_bytes: MAX_VIDEO_BYTES,
    missing: "Please select a video file",
    empty: "Please select a valid video file",
    wrong_type: "Please select a video file",
    too_large: "File size must be 100MB or less",
};

const THUMBNAIL_RULES: FileRules = FileRules {
    mime_prefix: "image/",
    max_bytes: MAX_IMAGE_BYTES,
    missing: "Please select a thumbnail image",
    empty: "Please select a valid image file",
    wrong_type: "Please select an image file",
    too_large: "Image file size must be 10MB or less",
};

const BACKGROUND_RULES: FileRules = FileRules {
    mime_prefix: "image/",
    max_bytes: MAX_IMAGE_BYTES,
    missing: "",
    empty: "Please select a valid background image file",
    wrong_type: "Please select an image file",
    too_large: "Background image file size must be 10MB or less",
};

fn check_file(
    errors: &mut FieldErrors,
    field: Field,
    file: Option<&UploadedFile>,
    rules: &FileRules,
    required: bool,
) {
    let Some(file) = file else {
        if required {
            errors.add(field, rules.missing);
        }
        return;
    };

    if file.size == 0 {
        errors.add(field, rules.empty);
    }
    if !file.mime_type.starts_with(rules.mime_prefix) {
        errors.add(field, rules.wrong_type);
    }
    if file.size > rules.max_bytes {
        errors.add(field, rules.too_large);
    }
}

/// Checks every field, returning all messages for all failing rules.
pub fn validate_submission(form: &FormSubmission) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    let title_chars = form.title.chars().count();
    if title_chars == 0 {
        errors.add(Field::Title, "Please enter a video title");
    } else if title_chars > MAX_TITLE_CHARS {
        errors.add(Field::Title, "Title must be 100 characters or fewer");
    }

    if let Some(subtitle) = &form.subtitle {
        if subtitle.chars().count() > MAX_SUBTITLE_CHARS {
            errors.add(Field::Subtitle, "Subtitle must be 100 characters or fewer");
        }
    }

    check_file(&mut errors, Field::VideoFile, form.video_file.as_ref(), &VIDEO_RULES, true);
    check_file(
        &mut errors,
        Field::ThumbnailImage,
        form.thumbnail_image.as_ref(),
        &THUMBNAIL_RULES,
        true,
    );
    check_file(
        &mut errors,
        Field::BackgroundTemplate,
        form.background_template.as_ref(),
        &BACKGROUND_RULES,
        false,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a submission and echoes what was received. Performs no processing.
pub fn submit_video_conversion(form: &FormSubmission) -> SubmissionResponse {
    match validate_submission(form) {
        Ok(()) => {
            log::debug!("Submission accepted: '{}'", form.title);
            SubmissionResponse {
                success: true,
                error: None,
                field_errors: None,
                data: Some(SubmissionSummary {
                    title: form.title.clone(),
                    has_video_file: form.video_file.is_some(),
                    has_thumbnail_image: form.thumbnail_image.is_some(),
                }),
            }
        }
        Err(field_errors) => {
            log::debug!("Submission rejected: {field_errors:?}");
            SubmissionResponse {
                success: false,
                error: Some(INVALID_SUBMISSION_MESSAGE.to_string()),
                field_errors: Some(field_errors),
                data: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(size: u64) -> UploadedFile {
        UploadedFile::new("clip.mp4", size, "video/mp4")
    }

    fn image(size: u64) -> UploadedFile {
        UploadedFile::new("thumb.png", size, "image/png")
    }

    fn valid_form() -> FormSubmission {
        FormSubmission {
            title: "Sunset timelapse".to_string(),
            subtitle: Some("Day 3".to_string()),
            video_file: Some(video(5 * 1024 * 1024)),
            thumbnail_image: Some(image(200 * 1024)),
            background_template: None,
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert_eq!(validate_submission(&valid_form()), Ok(()));
    }

    #[test]
    fn test_title_bounds() {
        let mut form = valid_form();
        form.title = String::new();
        let errors = validate_submission(&form).unwrap_err();
        assert_eq!(errors.get(Field::Title), ["Please enter a video title"]);

        form.title = "あ".repeat(100);
        assert!(validate_submission(&form).is_ok());

        form.title = "a".repeat(101);
        let errors = validate_submission(&form).unwrap_err();
        assert_eq!(errors.get(Field::Title), ["Title must be 100 characters or fewer"]);
    }

    #[test]
    fn test_subtitle_limit() {
        let mut form = valid_form();
        form.subtitle = Some("s".repeat(101));
        let errors = validate_submission(&form).unwrap_err();
        assert_eq!(errors.get(Field::Subtitle).len(), 1);
        assert!(errors.get(Field::Title).is_empty());
    }

    #[test]
    fn test_video_size_limit_is_inclusive() {
        let mut form = valid_form();
        form.video_file = Some(video(MAX_VIDEO_BYTES));
        assert!(validate_submission(&form).is_ok());

        form.video_file = Some(video(MAX_VIDEO_BYTES + 1));
        let errors = validate_submission(&form).unwrap_err();
        assert_eq!(errors.get(Field::VideoFile), ["File size must be 100MB or less"]);
    }

    #[test]
    fn test_empty_file_with_wrong_type_reports_both() {
        let mut form = valid_form();
        form.video_file = Some(UploadedFile::new("notes.txt", 0, "text/plain"));
        let errors = validate_submission(&form).unwrap_err();
        assert_eq!(
            errors.get(Field::VideoFile),
            ["Please select a valid video file", "Please select a video file"]
        );
    }

    #[test]
    fn test_missing_required_files() {
        let form = FormSubmission {
            title: "x".to_string(),
            ..FormSubmission::default()
        };
        let errors = validate_submission(&form).unwrap_err();
        assert_eq!(errors.get(Field::VideoFile), ["Please select a video file"]);
        assert_eq!(errors.get(Field::ThumbnailImage), ["Please select a thumbnail image"]);
        assert!(errors.get(Field::BackgroundTemplate).is_empty());
    }

    #[test]
    fn test_thumbnail_must_be_image() {
        let mut form = valid_form();
        form.thumbnail_image = Some(UploadedFile::new("thumb.mp4", 1024, "video/mp4"));
        let errors = validate_submission(&form).unwrap_err();
        assert_eq!(errors.get(Field::ThumbnailImage), ["Please select an image file"]);
    }

    #[test]
    fn test_background_template_rules() {
        let mut form = valid_form();
        form.background_template = Some(image(MAX_IMAGE_BYTES + 1));
        let errors = validate_submission(&form).unwrap_err();
        assert_eq!(
            errors.get(Field::BackgroundTemplate),
            ["Background image file size must be 10MB or less"]
        );
    }

    #[test]
    fn test_submit_echo_json() {
        let response = submit_video_conversion(&valid_form());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "data": {
                    "title": "Sunset timelapse",
                    "hasVideoFile": true,
                    "hasThumbnailImage": true
                }
            })
        );
    }

    #[test]
    fn test_submit_rejection_json() {
        let mut form = valid_form();
        form.title.clear();
        let json = serde_json::to_value(submit_video_conversion(&form)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid input data");
        assert_eq!(json["fieldErrors"]["title"][0], "Please enter a video title");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_uploaded_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.jpg");
        fs::write(&path, vec![0u8; 64]).unwrap();

        let file = UploadedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "cover.jpg");
        assert_eq!(file.size, 64);
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(file.path.as_deref(), Some(path.as_path()));
    }
}
