//! FFmpeg argument building for Shorts conversion
//!
//! Builds the fixed-shape argument list handed to the engine: a scale-and-pad
//! (or scale-and-crop) filter graph, encoder/quality/bitrate flags, the
//! fast-start flag and the overwrite flag.

use crate::options::{ConversionOptions, FrameMode};

/// Builder for constructing video filter chains
#[derive(Default)]
pub struct VideoFilterChain {
    filters: Vec<String>,
}

impl VideoFilterChain {
    /// Creates a new empty filter chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scales to the target box keeping the aspect ratio.
    ///
    /// `fit` is ffmpeg's `force_original_aspect_ratio` mode: `decrease` fits
    /// inside the box, `increase` covers it.
    #[must_use]
    pub fn add_scale(mut self, width: u32, height: u32, fit: &str) -> Self {
        self.filters.push(format!(
            "scale={width}:{height}:force_original_aspect_ratio={fit}"
        ));
        self
    }

    /// Pads to the target box with the frame centered
    #[must_use]
    pub fn add_center_pad(mut self, width: u32, height: u32, color: &str) -> Self {
        self.filters
            .push(format!("pad={width}:{height}:(ow-iw)/2:(oh-ih)/2:{color}"));
        self
    }

    /// Crops to the target box (ffmpeg centers by default)
    #[must_use]
    pub fn add_crop(mut self, width: u32, height: u32) -> Self {
        self.filters.push(format!("crop={width}:{height}"));
        self
    }

    /// Builds the filter chain into a single filter string
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}

/// Returns the `-vf` filter graph for the given options.
#[must_use]
pub fn build_filter_graph(options: &ConversionOptions) -> String {
    let width = options.resolution.width;
    let height = options.resolution.height;

    let chain = match options.frame_mode {
        FrameMode::Pad => VideoFilterChain::new()
            .add_scale(width, height, "decrease")
            .add_center_pad(width, height, options.padding_color.trim()),
        FrameMode::Crop => VideoFilterChain::new()
            .add_scale(width, height, "increase")
            .add_crop(width, height),
    };

    // Both arms push two filters
    chain.build().unwrap_or_default()
}

/// Builds the complete engine argument list for one conversion.
#[must_use]
pub fn build_conversion_args(
    options: &ConversionOptions,
    input_name: &str,
    output_name: &str,
) -> Vec<String> {
    let mut args: Vec<String> = Vec::with_capacity(24);
    let mut push = |flag: &str, value: &str| {
        args.push(flag.to_string());
        args.push(value.to_string());
    };

    push("-i", input_name);
    push("-vf", &build_filter_graph(options));
    push("-c:v", options.video_codec.as_str());
    push("-preset", options.preset.as_str());
    push("-crf", &options.crf.to_string());
    push("-c:a", options.audio_codec.as_str());
    push("-b:a", &options.audio_bitrate);
    if let Some(limit) = options.max_duration_secs {
        push("-t", &limit.to_string());
    }
    push("-movflags", "+faststart");

    args.push("-y".to_string());
    args.push(output_name.to_string());
    args
}

/// Reads the `-t` output duration cap back out of an argument list.
#[must_use]
pub fn output_duration_limit(args: &[String]) -> Option<f64> {
    args.windows(2)
        .find(|pair| pair[0] == "-t")
        .and_then(|pair| pair[1].parse::<f64>().ok())
        .filter(|secs| *secs > 0.0)
}
