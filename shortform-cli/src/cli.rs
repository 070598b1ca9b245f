// shortform-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use shortform_core::{AudioCodec, FrameMode, Preset, VideoCodec};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Shortform: Landscape to vertical Shorts converter",
    long_about = "Converts landscape videos into 9:16 vertical Shorts using ffmpeg via shortform-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug output (engine command lines, ffmpeg log) on the console
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Directory for run log files. No log file is written when unset.
    #[arg(long, global = true, value_name = "LOG_DIR", env = "SHORTFORM_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts a landscape video into a vertical Shorts video
    Convert(ConvertArgs),
    /// Checks a conversion form submission and prints the JSON response
    Submit(SubmitArgs),
}

/// Options for locating and loading the ffmpeg engine.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Path to the ffmpeg binary (default: ffmpeg on PATH or next to shortform)
    #[arg(long, value_name = "FFMPEG", env = "SHORTFORM_FFMPEG_PATH")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Download a static ffmpeg build when none is installed
    #[arg(long, env = "SHORTFORM_AUTO_DOWNLOAD")]
    pub auto_download: bool,

    /// Parent directory for the engine's scratch workspace
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Landscape video to convert
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file, or a directory to receive shorts-video.mp4 (default: current directory)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// How the frame is fitted: pad (letterbox) or crop (fill). Crop also
    /// switches the defaults to 1080x1920, CRF 25 and a 60 second cap.
    #[arg(long, value_name = "MODE", default_value_t = FrameMode::Pad)]
    pub mode: FrameMode,

    /// Output width in pixels (even)
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Output height in pixels (even)
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Video encoder: libx264 or libx265
    #[arg(long, value_name = "CODEC")]
    pub video_codec: Option<VideoCodec>,

    /// Encoder preset, ultrafast to veryslow
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<Preset>,

    /// Constant rate factor (0-51, lower is higher quality)
    #[arg(long, value_name = "CRF", value_parser = clap::value_parser!(u8).range(0..=51))]
    pub crf: Option<u8>,

    /// Audio encoder: aac or copy
    #[arg(long, value_name = "CODEC")]
    pub audio_codec: Option<AudioCodec>,

    /// Audio bitrate, e.g. 128k
    #[arg(long, value_name = "BITRATE")]
    pub audio_bitrate: Option<String>,

    /// Color of the padding bars in pad mode
    #[arg(long, value_name = "COLOR")]
    pub pad_color: Option<String>,

    /// Truncate the output to this many seconds
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_duration: Option<u32>,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Print the conversion report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Video title (1-100 characters)
    #[arg(long, value_name = "TITLE")]
    pub title: String,

    /// Optional subtitle (up to 100 characters)
    #[arg(long, value_name = "SUBTITLE")]
    pub subtitle: Option<String>,

    /// Video file (video/*, up to 100MB)
    #[arg(long, value_name = "FILE")]
    pub video: Option<PathBuf>,

    /// Thumbnail image (image/*, up to 10MB)
    #[arg(long, value_name = "FILE")]
    pub thumbnail: Option<PathBuf>,

    /// Optional background template image (image/*, up to 10MB)
    #[arg(long, value_name = "FILE")]
    pub background: Option<PathBuf>,

    /// Convert the video after the submission is accepted
    #[arg(long)]
    pub convert: bool,

    /// Output file or directory for --convert (default: current directory)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT", requires = "convert")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}
