//! `FFmpeg` event translation
//!
//! Turns the event stream of an ffmpeg-sidecar child into `EngineEvent`s:
//! log lines pass through, progress timestamps become completion ratios once
//! the input duration is known.

use super::EngineEvent;
use crate::utils::parse_ffmpeg_time;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel as FfmpegLogLevel};

/// Handler for the events of one ffmpeg run
pub struct EngineProgressHandler {
    /// Seconds of output expected, known once ffmpeg reports the input duration.
    total_secs: Option<f64>,
    /// `-t` cap from the argument list.
    limit_secs: Option<f64>,
    stderr_buffer: String,
}

impl EngineProgressHandler {
    #[must_use]
    pub fn new(limit_secs: Option<f64>) -> Self {
        Self {
            total_secs: None,
            limit_secs,
            stderr_buffer: String::new(),
        }
    }

    /// Handles an `FFmpeg` event, forwarding anything relevant to `emit`
    pub fn handle_event(&mut self, event: FfmpegEvent, emit: &mut dyn FnMut(EngineEvent)) {
        match event {
            FfmpegEvent::ParsedDuration(duration) if duration.input_index == 0 => {
                self.set_input_duration(duration.duration);
            }
            FfmpegEvent::Progress(progress) => {
                if let Some(ratio) = self.ratio_at(&progress.time) {
                    emit(EngineEvent::Progress(ratio));
                }
            }
            FfmpegEvent::Log(level, message) => self.handle_log(&level, message, emit),
            FfmpegEvent::Error(error) => self.handle_error(error, emit),
            _ => {}
        }
    }

    /// Gets the accumulated stderr buffer
    #[must_use]
    pub fn stderr_buffer(&self) -> &str {
        &self.stderr_buffer
    }

    fn set_input_duration(&mut self, secs: f64) {
        if self.total_secs.is_some() || !secs.is_finite() || secs <= 0.0 {
            return;
        }
        let total = self.limit_secs.map_or(secs, |limit| secs.min(limit));
        log::debug!("Progress duration: {total:.2}s (input {secs:.2}s)");
        self.total_secs = Some(total);
    }

    /// Completion ratio for an ffmpeg `time=` value, clamped to 0.0..=1.0.
    fn ratio_at(&self, time: &str) -> Option<f64> {
        let total = self.total_secs?;
        let current = parse_ffmpeg_time(time)?;
        Some((current / total).clamp(0.0, 1.0))
    }

    fn handle_log(
        &mut self,
        level: &FfmpegLogLevel,
        message: String,
        emit: &mut dyn FnMut(EngineEvent),
    ) {
        if message.contains("Skipping NAL unit") {
            return;
        }

        let log_level = map_ffmpeg_log_level(level);
        if log_level == log::Level::Info {
            log::debug!(target: "ffmpeg_log", "{message}");
        } else {
            log::log!(target: "ffmpeg_log", log_level, "{message}");
        }
        if matches!(
            level,
            FfmpegLogLevel::Error | FfmpegLogLevel::Fatal | FfmpegLogLevel::Unknown
        ) {
            self.stderr_buffer.push_str(&message);
            self.stderr_buffer.push('\n');
        }
        emit(EngineEvent::Log(message));
    }

    fn handle_error(&mut self, error: String, emit: &mut dyn FnMut(EngineEvent)) {
        if is_non_critical_ffmpeg_error(&error) {
            log::debug!("ffmpeg non-critical message: {error}");
        } else {
            log::warn!(target: "ffmpeg_log", "{error}");
        }

        self.stderr_buffer.push_str(&error);
        self.stderr_buffer.push('\n');
        emit(EngineEvent::Log(error));
    }
}

/// Maps `FFmpeg` log level to Rust log level
fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Info,
        _ => log::Level::Trace,
    }
}

/// Stderr lines that appear on healthy runs.
fn is_non_critical_ffmpeg_error(error: &str) -> bool {
    error.contains("deprecated pixel format")
        || error.contains("No accelerated colorspace conversion")
        || error.contains("automatically inserted filter")
        || error.contains("Timestamps are unset")
        || error.contains("first frame is no keyframe")
}
