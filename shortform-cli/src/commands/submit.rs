//! Implementation of the 'submit' subcommand.
//!
//! Describes the given files, validates the form and prints the JSON
//! response. A rejected submission exits with an error; an accepted one can
//! continue straight into a conversion of its video.

use crate::cli::SubmitArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

use log::info;
use shortform_core::validation::INVALID_SUBMISSION_MESSAGE;
use shortform_core::{
    ConversionOptions, CoreError, FormSubmission, SubmissionResponse, UploadedFile,
    submit_video_conversion,
};

use std::path::Path;

fn describe(path: Option<&Path>) -> CliResult<Option<UploadedFile>> {
    path.map(|p| {
        UploadedFile::from_path(p)
            .cli_with_context(|| format!("Invalid input path '{}'", p.display()))
    })
    .transpose()
}

/// Builds the form submission from the flags, reading only file metadata.
pub fn build_submission(args: &SubmitArgs) -> CliResult<FormSubmission> {
    Ok(FormSubmission {
        title: args.title.clone(),
        subtitle: args.subtitle.clone(),
        video_file: describe(args.video.as_deref())?,
        thumbnail_image: describe(args.thumbnail.as_deref())?,
        background_template: describe(args.background.as_deref())?,
    })
}

fn print_response(response: &SubmissionResponse) -> CliResult<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| CoreError::OperationFailed(e.to_string()))?;
    println!("{json}");
    Ok(())
}

/// Runs the `submit` command.
pub fn run_submit(args: SubmitArgs) -> CliResult<()> {
    let submission = build_submission(&args)?;
    let response = submit_video_conversion(&submission);
    print_response(&response)?;

    if let Some(errors) = &response.field_errors {
        output::print_field_errors(errors);
        return Err(CoreError::OperationFailed(
            INVALID_SUBMISSION_MESSAGE.to_string(),
        ));
    }
    info!("Submission '{}' accepted", submission.title);

    if args.convert {
        let video = submission
            .video_file
            .and_then(|file| file.path)
            .ok_or_else(|| {
                CoreError::OperationFailed("Accepted submission has no video path".to_string())
            })?;
        let report = super::convert::convert_file(
            &video,
            ConversionOptions::default(),
            &args.engine,
            args.output.as_deref(),
            true,
        )?;
        super::convert::print_report(&report);
    }
    Ok(())
}
