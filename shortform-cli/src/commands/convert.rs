//! Implementation of the 'convert' subcommand.
//!
//! Resolves the input, builds the conversion options from the flags, and runs
//! select -> load engine -> convert -> download through a `FormController`.

use crate::cli::{ConvertArgs, EngineArgs};
use crate::config::DEFAULT_OUTPUT_DIR;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

use log::{debug, warn};
use shortform_core::{
    ConversionManager, ConversionOptions, ConversionReport, CoreError, FormController, FrameMode,
    InputFile, Resolution, format_bytes, format_duration,
};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Canonicalizes a user-supplied input path, rejecting anything but a file.
pub fn resolve_input_path(path: &Path) -> CliResult<PathBuf> {
    let resolved = path
        .canonicalize()
        .cli_with_context(|| format!("Invalid input path '{}'", path.display()))?;
    if !resolved.is_file() {
        return Err(CoreError::PathError(format!(
            "Invalid input path '{}': not a file",
            path.display()
        )));
    }
    Ok(resolved)
}

/// Builds conversion options from the flags. `--mode crop` starts from the
/// crop profile; explicit flags override either base.
pub fn build_options(args: &ConvertArgs) -> CliResult<ConversionOptions> {
    let mut options = match args.mode {
        FrameMode::Pad => ConversionOptions::default(),
        FrameMode::Crop => ConversionOptions::crop_profile(),
    };

    options.resolution = Resolution {
        width: args.width.unwrap_or(options.resolution.width),
        height: args.height.unwrap_or(options.resolution.height),
    };
    if let Some(codec) = args.video_codec {
        options.video_codec = codec;
    }
    if let Some(preset) = args.preset {
        options.preset = preset;
    }
    if let Some(crf) = args.crf {
        options.crf = crf;
    }
    if let Some(codec) = args.audio_codec {
        options.audio_codec = codec;
    }
    if let Some(bitrate) = &args.audio_bitrate {
        options.audio_bitrate = bitrate.clone();
    }
    if let Some(color) = &args.pad_color {
        options.padding_color = color.clone();
    }
    if args.max_duration.is_some() {
        options.max_duration_secs = args.max_duration;
    }

    options.validate()?;
    Ok(options)
}

/// Converts one file and writes the result. Shared by `convert` and
/// `submit --convert`.
pub fn convert_file(
    input_path: &Path,
    options: ConversionOptions,
    engine: &EngineArgs,
    output: Option<&Path>,
    show_progress: bool,
) -> CliResult<ConversionReport> {
    let start = Instant::now();
    let input = InputFile::from_path(input_path)?;
    if !input.mime_type.starts_with("video/") {
        warn!(
            "{} does not look like a video ({}), converting anyway",
            input.name, input.mime_type
        );
    }

    let input_name = input.name.clone();
    let input_size = input.size();
    let resolution = options.resolution;
    let frame_mode = options.frame_mode;

    let manager = ConversionManager::new(super::engine_config(engine));
    let mut form = FormController::new(manager).with_options(options);
    form.select_file(Some(input));

    if show_progress {
        output::print_section("Conversion");
        output::print_status("Input", &input_path.display().to_string(), false);
        output::print_status("Input size", &format_bytes(input_size), false);
        output::print_status("Target", &format!("{resolution} ({frame_mode})"), false);
    }

    form.load_engine()?;

    let bar = if show_progress {
        output::create_progress_bar("Converting")
    } else {
        indicatif::ProgressBar::hidden()
    };
    let observer_bar = bar.clone();
    form.set_progress_observer(move |percent| observer_bar.set_position(u64::from(percent)));

    let converted = form.convert();
    bar.finish_and_clear();
    converted?;

    let dest = output.map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), Path::to_path_buf);
    let written = form.download(&dest)?;
    let output_size = form
        .state()
        .output
        .map_or(0, |video| video.size());

    Ok(ConversionReport {
        input: input_name,
        output: written,
        input_size,
        output_size,
        resolution,
        frame_mode,
        elapsed: start.elapsed(),
    })
}

/// Prints a human-readable summary of a finished conversion.
pub fn print_report(report: &ConversionReport) {
    output::print_section("Conversion complete");
    output::print_success(&format!("Saved {}", report.output.display()));
    output::print_status("Output size", &format_bytes(report.output_size), true);
    output::print_status(
        "Size vs input",
        &format!("{:.1}%", report.size_ratio_percent()),
        false,
    );
    output::print_status(
        "Time",
        &format_duration(report.elapsed.as_secs_f64()),
        false,
    );
}

/// Runs the `convert` command.
pub fn run_convert(args: ConvertArgs) -> CliResult<()> {
    let input_path = resolve_input_path(&args.input)?;
    let options = build_options(&args)?;
    debug!("Conversion options: {options:?}");

    let report = convert_file(
        &input_path,
        options,
        &args.engine,
        args.output.as_deref(),
        !args.json,
    )?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CoreError::OperationFailed(e.to_string()))?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(())
}
