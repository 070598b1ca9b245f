//! Conversion options passed to the engine.
//!
//! Values are immutable per conversion; every field has a default matching the
//! standard 720x1280 padded Shorts output. Codec identifiers are passed to
//! ffmpeg verbatim.

use crate::config::{
    CROP_PROFILE_CRF, CROP_PROFILE_HEIGHT, CROP_PROFILE_MAX_DURATION_SECS, CROP_PROFILE_WIDTH,
    DEFAULT_AUDIO_BITRATE, DEFAULT_CRF, DEFAULT_HEIGHT, DEFAULT_PADDING_COLOR, DEFAULT_WIDTH,
    MAX_CRF,
};
use crate::error::{CoreError, CoreResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Generates `as_str`, `Display` and `FromStr` for identifier enums that map
/// one-to-one onto ffmpeg argument values.
macro_rules! ffmpeg_identifier {
    ($name:ident, $what:literal, { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> CoreResult<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    other => Err(CoreError::InvalidOptions(format!(
                        "unknown {} '{}' (expected one of: {})",
                        $what,
                        other,
                        [$($value),+].join(", ")
                    ))),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    #[default]
    Libx264,
    Libx265,
}

ffmpeg_identifier!(VideoCodec, "video codec", {
    Libx264 => "libx264",
    Libx265 => "libx265",
});

/// Encoder speed/compression trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    #[default]
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

ffmpeg_identifier!(Preset, "preset", {
    Ultrafast => "ultrafast",
    Superfast => "superfast",
    Veryfast => "veryfast",
    Faster => "faster",
    Fast => "fast",
    Medium => "medium",
    Slow => "slow",
    Slower => "slower",
    Veryslow => "veryslow",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    #[default]
    Aac,
    Copy,
}

ffmpeg_identifier!(AudioCodec, "audio codec", {
    Aac => "aac",
    Copy => "copy",
});

/// How the landscape frame is fitted into the vertical canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameMode {
    /// Scale down to fit and pad the remaining area with the padding color.
    #[default]
    Pad,
    /// Scale up to cover and crop the overflow around the center.
    Crop,
}

ffmpeg_identifier!(FrameMode, "frame mode", {
    Pad => "pad",
    Crop => "crop",
});

/// Parameters for a single conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    pub resolution: Resolution,
    pub video_codec: VideoCodec,
    pub preset: Preset,
    /// Constant rate factor, 0-51, smaller is higher quality.
    pub crf: u8,
    pub audio_codec: AudioCodec,
    /// Audio bitrate as understood by ffmpeg, e.g. `128k`.
    pub audio_bitrate: String,
    pub padding_color: String,
    pub frame_mode: FrameMode,
    /// Output is truncated to this many seconds when set.
    pub max_duration_secs: Option<u32>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            video_codec: VideoCodec::default(),
            preset: Preset::default(),
            crf: DEFAULT_CRF,
            audio_codec: AudioCodec::default(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            padding_color: DEFAULT_PADDING_COLOR.to_string(),
            frame_mode: FrameMode::default(),
            max_duration_secs: None,
        }
    }
}

impl ConversionOptions {
    /// Full-HD vertical output, center-cropped and capped at one minute.
    #[must_use]
    pub fn crop_profile() -> Self {
        Self {
            resolution: Resolution {
                width: CROP_PROFILE_WIDTH,
                height: CROP_PROFILE_HEIGHT,
            },
            crf: CROP_PROFILE_CRF,
            frame_mode: FrameMode::Crop,
            max_duration_secs: Some(CROP_PROFILE_MAX_DURATION_SECS),
            ..Self::default()
        }
    }

    /// Checks the options before they are turned into engine arguments.
    pub fn validate(&self) -> CoreResult<()> {
        let Resolution { width, height } = self.resolution;
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidOptions(format!(
                "resolution must be non-zero, got {}",
                self.resolution
            )));
        }
        // yuv420p output needs even dimensions
        if width % 2 != 0 || height % 2 != 0 {
            return Err(CoreError::InvalidOptions(format!(
                "resolution must have even dimensions, got {}",
                self.resolution
            )));
        }

        if self.crf > MAX_CRF {
            return Err(CoreError::InvalidOptions(format!(
                "crf must be between 0 and {MAX_CRF}, got {}",
                self.crf
            )));
        }

        if !is_valid_bitrate(&self.audio_bitrate) {
            return Err(CoreError::InvalidOptions(format!(
                "audio bitrate '{}' is not of the form <digits>[k|M]",
                self.audio_bitrate
            )));
        }

        if self.frame_mode == FrameMode::Pad {
            let color = self.padding_color.trim();
            if color.is_empty() || color.contains([':', ',', ';', '[', ']', '\'']) {
                return Err(CoreError::InvalidOptions(format!(
                    "padding color '{}' cannot be used in a filter graph",
                    self.padding_color
                )));
            }
        }

        if self.max_duration_secs == Some(0) {
            return Err(CoreError::InvalidOptions(
                "maximum duration must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_valid_bitrate(bitrate: &str) -> bool {
    let digits = bitrate
        .strip_suffix(['k', 'K', 'M'])
        .unwrap_or(bitrate);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
