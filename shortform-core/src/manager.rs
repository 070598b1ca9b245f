// ============================================================================
// shortform-core/src/manager.rs
// ============================================================================
//
// CONVERSION MANAGER: Sequencing of Engine Calls
//
// The ConversionManager owns the single engine instance of a session. It
// instantiates and loads the engine lazily, runs one conversion at a time
// (write input -> exec -> read output), and forwards the engine's log and
// progress events to at most one callback per kind.
//
// KEY COMPONENTS:
// - ConversionManager: Load/convert/unload plus event subscription
// - Listener: The two subscribable event kinds
// - ProgressTracker: Percent scaling, clamping and monotonic reporting

// ---- Internal crate imports ----
use crate::config::{EngineConfig, INPUT_FILE_NAME, OUTPUT_FILE_NAME};
use crate::error::{CoreError, CoreResult};
use crate::external::{Engine, EngineEvent, SidecarEngine, build_conversion_args};
use crate::media::{ConvertedVideo, InputFile};
use crate::options::ConversionOptions;

// ---- External crate imports ----
use log::{debug, error, info, warn};

pub type ProgressCallback = Box<dyn FnMut(u8)>;
pub type LogCallback = Box<dyn FnMut(&str)>;

/// A subscription to one kind of manager event.
pub enum Listener {
    /// Integer percent, 0 to 100, never decreasing within a conversion.
    Progress(ProgressCallback),
    /// Engine output lines plus the command line of each run.
    Log(LogCallback),
}

// ============================================================================
// PROGRESS TRACKING
// ============================================================================

/// Converts engine ratios into monotonic integer percentages.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressTracker {
    last: Option<u8>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the percent to report for `ratio`, or `None` when it would not
    /// advance past what was already reported.
    pub fn advance(&mut self, ratio: f64) -> Option<u8> {
        if !ratio.is_finite() {
            return None;
        }
        let percent = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;
        match self.last {
            Some(last) if percent <= last => None,
            _ => {
                self.last = Some(percent);
                Some(percent)
            }
        }
    }

    /// Reports 100 unless it was already reported.
    pub fn finish(&mut self) -> Option<u8> {
        self.advance(1.0)
    }

    #[must_use]
    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

// ============================================================================
// CONVERSION MANAGER
// ============================================================================

/// Owns the engine and sequences conversions.
///
/// # Examples
///
/// ```rust
/// use shortform_core::external::{EngineEvent, ScriptedEngine};
/// use shortform_core::{ConversionManager, ConversionOptions, EngineConfig, InputFile};
///
/// let engine = ScriptedEngine::new()
///     .with_events(vec![EngineEvent::Progress(0.5)])
///     .with_output(b"mp4 bytes".to_vec());
/// let mut manager =
///     ConversionManager::with_engine_factory(EngineConfig::default(), move || engine.clone());
///
/// manager.load().unwrap();
/// let input = InputFile::new("clip.mp4", b"raw".to_vec());
/// let video = manager
///     .convert_to_shorts(&input, &ConversionOptions::default())
///     .unwrap();
/// assert_eq!(video.bytes, b"mp4 bytes");
/// ```
pub struct ConversionManager<E: Engine = SidecarEngine> {
    config: EngineConfig,
    factory: Box<dyn Fn() -> E>,
    engine: Option<E>,
    on_progress: Option<ProgressCallback>,
    on_log: Option<LogCallback>,
}

impl ConversionManager<SidecarEngine> {
    /// Manager backed by a local ffmpeg binary.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_engine_factory(config, SidecarEngine::new)
    }
}

impl<E: Engine> ConversionManager<E> {
    /// Manager whose engine is created by `factory` on the first `load`.
    pub fn with_engine_factory(config: EngineConfig, factory: impl Fn() -> E + 'static) -> Self {
        Self {
            config,
            factory: Box::new(factory),
            engine: None,
            on_progress: None,
            on_log: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    /// Registers `listener`, replacing any earlier callback of the same kind.
    pub fn on(&mut self, listener: Listener) {
        match listener {
            Listener::Progress(callback) => self.on_progress = Some(callback),
            Listener::Log(callback) => self.on_log = Some(callback),
        }
    }

    pub fn on_progress(&mut self, callback: impl FnMut(u8) + 'static) {
        self.on(Listener::Progress(Box::new(callback)));
    }

    pub fn on_log(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on(Listener::Log(Box::new(callback)));
    }

    /// Instantiates and initializes the engine. Does nothing when already
    /// loaded. Failures are logged and reported as `CoreError::EngineLoad`.
    pub fn load(&mut self) -> CoreResult<()> {
        if self.engine.is_some() {
            return Ok(());
        }

        info!("Loading video engine...");
        let mut engine = (self.factory)();
        engine.load(&self.config).map_err(|e| {
            error!("Video engine loading failed: {e}");
            CoreError::EngineLoad
        })?;

        self.engine = Some(engine);
        info!("Video engine ready");
        Ok(())
    }

    /// Drops the engine instance and its workspace.
    pub fn unload(&mut self) {
        if self.engine.take().is_some() {
            debug!("Video engine unloaded");
        }
    }

    /// Converts `input` into a vertical Shorts video.
    ///
    /// Fails with `CoreError::NotLoaded` before `load`, and with
    /// `CoreError::Conversion` when the engine cannot write, run or read. The
    /// engine stays loaded after a failure so the call can be retried.
    pub fn convert_to_shorts(
        &mut self,
        input: &InputFile,
        options: &ConversionOptions,
    ) -> CoreResult<ConvertedVideo> {
        let Self {
            engine,
            on_progress,
            on_log,
            ..
        } = self;
        let engine = engine.as_mut().ok_or(CoreError::NotLoaded)?;
        options.validate()?;

        info!(
            "Converting {} ({} bytes) to {} ({} mode)",
            input.name,
            input.bytes.len(),
            options.resolution,
            options.frame_mode
        );

        let mut tracker = ProgressTracker::new();
        let result = run_conversion(engine, input, options, &mut tracker, on_progress, on_log);
        cleanup_workspace(engine);

        match result {
            Ok(bytes) => {
                if let (Some(percent), Some(callback)) = (tracker.finish(), on_progress.as_mut()) {
                    callback(percent);
                }
                info!("Conversion finished: {} bytes", bytes.len());
                Ok(ConvertedVideo::new(bytes))
            }
            Err(e) => {
                error!("Conversion failed: {e}");
                Err(CoreError::Conversion(e.to_string()))
            }
        }
    }
}

fn run_conversion<E: Engine>(
    engine: &mut E,
    input: &InputFile,
    options: &ConversionOptions,
    tracker: &mut ProgressTracker,
    on_progress: &mut Option<ProgressCallback>,
    on_log: &mut Option<LogCallback>,
) -> CoreResult<Vec<u8>> {
    engine.write_file(INPUT_FILE_NAME, &input.bytes)?;

    let args = build_conversion_args(options, INPUT_FILE_NAME, OUTPUT_FILE_NAME);
    let command_line = format!("ffmpeg command: {}", args.join(" "));
    debug!("{command_line}");
    if let Some(callback) = on_log.as_mut() {
        callback(command_line.as_str());
    }

    engine.exec(&args, &mut |event| match event {
        EngineEvent::Log(message) => {
            if let Some(callback) = on_log.as_mut() {
                callback(message.as_str());
            }
        }
        EngineEvent::Progress(ratio) => {
            if let (Some(percent), Some(callback)) = (tracker.advance(ratio), on_progress.as_mut()) {
                callback(percent);
            }
        }
    })?;

    engine.read_file(OUTPUT_FILE_NAME)
}

/// Removes conversion files from the engine workspace. Missing files are
/// expected after a failed run.
fn cleanup_workspace<E: Engine>(engine: &mut E) {
    for name in [INPUT_FILE_NAME, OUTPUT_FILE_NAME] {
        match engine.delete_file(name) {
            Ok(()) | Err(CoreError::FileNotFound(_)) => {}
            Err(e) => warn!("Failed to remove engine file {name}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::ScriptedEngine;

    #[test]
    fn test_tracker_scales_and_rounds() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.advance(0.0), Some(0));
        assert_eq!(tracker.advance(0.124), Some(12));
        assert_eq!(tracker.advance(0.126), Some(13));
        assert_eq!(tracker.last(), Some(13));
    }

    #[test]
    fn test_tracker_is_monotonic_and_clamped() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.advance(0.5), Some(50));
        assert_eq!(tracker.advance(0.4), None);
        assert_eq!(tracker.advance(0.5), None);
        assert_eq!(tracker.advance(1.7), Some(100));
        assert_eq!(tracker.finish(), None);
    }

    #[test]
    fn test_tracker_ignores_bad_ratios() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.advance(f64::NAN), None);
        assert_eq!(tracker.advance(-0.3), Some(0));
        assert_eq!(tracker.finish(), Some(100));
    }

    #[test]
    fn test_later_listener_replaces_earlier() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let engine = ScriptedEngine::new()
            .with_events(vec![EngineEvent::Progress(0.5)])
            .with_output(vec![0u8]);
        let mut manager =
            ConversionManager::with_engine_factory(EngineConfig::default(), move || engine.clone());

        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let first_sink = Rc::clone(&first);
        let second_sink = Rc::clone(&second);
        manager.on_progress(move |p| first_sink.borrow_mut().push(p));
        manager.on_progress(move |p| second_sink.borrow_mut().push(p));

        manager.load().unwrap();
        manager
            .convert_to_shorts(&InputFile::new("a.mp4", vec![1]), &ConversionOptions::default())
            .unwrap();

        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), vec![50, 100]);
    }

    #[test]
    fn test_invalid_options_do_not_touch_engine() {
        let engine = ScriptedEngine::new();
        let handle = engine.clone();
        let mut manager =
            ConversionManager::with_engine_factory(EngineConfig::default(), move || engine.clone());
        manager.load().unwrap();

        let options = ConversionOptions {
            crf: 99,
            ..ConversionOptions::default()
        };
        let err = manager
            .convert_to_shorts(&InputFile::new("a.mp4", vec![1]), &options)
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidOptions(_)));
        assert!(handle.written_files().is_empty());
        assert!(handle.exec_calls().is_empty());
    }

    #[test]
    fn test_unload_resets_loaded_flag() {
        let mut manager = ConversionManager::with_engine_factory(
            EngineConfig::default(),
            ScriptedEngine::new,
        );
        manager.load().unwrap();
        assert!(manager.is_loaded());
        manager.unload();
        assert!(!manager.is_loaded());
    }
}
