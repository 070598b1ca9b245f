// ============================================================================
// shortform-core/src/form.rs
// ============================================================================
//
// FORM CONTROLLER: User Actions and Transient Conversion State
//
// The FormController holds what a front end displays while a video is being
// converted (selected file, engine readiness, progress, error, output) and
// turns user actions into ConversionManager calls. Progress reported by the
// manager is written into the shared state as it arrives, so an observer sees
// a consistent snapshot at every step.
//
// KEY COMPONENTS:
// - FormState: Snapshot of the controller state
// - ConversionStatus: Status derived from FormState
// - FormController: select/load/convert/reset/download

use crate::error::{CoreError, CoreResult};
use crate::external::{Engine, SidecarEngine};
use crate::manager::{ConversionManager, Listener, ProgressCallback};
use crate::media::{ConvertedVideo, InputFile};
use crate::options::ConversionOptions;

use log::{debug, info};

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Coarse status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Idle,
    Ready,
    Converting,
    Completed,
    Error,
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConversionStatus::Idle => "idle",
            ConversionStatus::Ready => "ready",
            ConversionStatus::Converting => "converting",
            ConversionStatus::Completed => "completed",
            ConversionStatus::Error => "error",
        })
    }
}

/// Transient state of one conversion form.
///
/// `progress` stays within 0..=100 and `output` is only present after a
/// successful conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub selected_file: Option<Rc<InputFile>>,
    pub progress: u8,
    pub error: Option<String>,
    pub output: Option<Rc<ConvertedVideo>>,
    pub engine_ready: bool,
    pub converting: bool,
}

impl FormState {
    #[must_use]
    pub fn status(&self) -> ConversionStatus {
        if self.error.is_some() {
            ConversionStatus::Error
        } else if self.converting {
            ConversionStatus::Converting
        } else if self.output.is_some() {
            ConversionStatus::Completed
        } else if self.engine_ready {
            ConversionStatus::Ready
        } else {
            ConversionStatus::Idle
        }
    }

    /// Whether the convert action is currently available.
    #[must_use]
    pub fn can_convert(&self) -> bool {
        self.selected_file.is_some() && self.engine_ready && !self.converting
    }
}

/// Drives a `ConversionManager` from user actions.
pub struct FormController<E: Engine = SidecarEngine> {
    manager: ConversionManager<E>,
    options: ConversionOptions,
    state: Rc<RefCell<FormState>>,
    progress_observer: Rc<RefCell<Option<ProgressCallback>>>,
}

impl<E: Engine> FormController<E> {
    /// Takes ownership of `manager` and subscribes to its progress events.
    pub fn new(mut manager: ConversionManager<E>) -> Self {
        let state = Rc::new(RefCell::new(FormState {
            engine_ready: manager.is_loaded(),
            ..FormState::default()
        }));
        let progress_observer: Rc<RefCell<Option<ProgressCallback>>> = Rc::new(RefCell::new(None));

        let progress_state = Rc::clone(&state);
        let observer = Rc::clone(&progress_observer);
        manager.on_progress(move |percent| {
            progress_state.borrow_mut().progress = percent;
            if let Some(callback) = observer.borrow_mut().as_mut() {
                callback(percent);
            }
        });

        Self {
            manager,
            options: ConversionOptions::default(),
            state,
            progress_observer,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    /// Called with every progress percent, after the state has been updated.
    pub fn set_progress_observer(&mut self, callback: impl FnMut(u8) + 'static) {
        *self.progress_observer.borrow_mut() = Some(Box::new(callback));
    }

    /// Forwards engine log lines to `callback`.
    pub fn set_log_observer(&mut self, callback: impl FnMut(&str) + 'static) {
        self.manager.on(Listener::Log(Box::new(callback)));
    }

    /// Selects (or clears) the input video. Any previous output or error is
    /// discarded.
    pub fn select_file(&mut self, file: Option<InputFile>) {
        if let Some(file) = &file {
            debug!("Selected {} ({} bytes, {})", file.name, file.size(), file.mime_type);
        }
        let mut state = self.state.borrow_mut();
        state.selected_file = file.map(Rc::new);
        state.output = None;
        state.error = None;
    }

    /// Loads the engine unless it is already ready.
    pub fn load_engine(&mut self) -> CoreResult<()> {
        if self.state.borrow().engine_ready {
            return Ok(());
        }

        let result = self.manager.load();

        let mut state = self.state.borrow_mut();
        match result {
            Ok(()) => {
                state.engine_ready = true;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Converts the selected file with the controller's options.
    pub fn convert(&mut self) -> CoreResult<()> {
        let selected = self.state.borrow().selected_file.clone();
        let Some(input) = selected else {
            return self.fail(CoreError::NoInputSelected);
        };
        if !self.manager.is_loaded() {
            return self.fail(CoreError::NotLoaded);
        }

        {
            let mut state = self.state.borrow_mut();
            state.progress = 0;
            state.output = None;
            state.error = None;
            state.converting = true;
        }

        let result = self.manager.convert_to_shorts(&input, &self.options);

        let mut state = self.state.borrow_mut();
        state.converting = false;
        match result {
            Ok(video) => {
                info!("{} converted ({} bytes)", input.name, video.size());
                state.output = Some(Rc::new(video));
                state.progress = 100;
                Ok(())
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Returns the form to its initial state. The engine stays loaded.
    pub fn reset(&mut self) {
        let mut state = self.state.borrow_mut();
        let engine_ready = state.engine_ready;
        *state = FormState {
            engine_ready,
            ..FormState::default()
        };
    }

    /// Writes the converted video to `dest` (see `ConvertedVideo::save`).
    pub fn download(&self, dest: &Path) -> CoreResult<PathBuf> {
        let output = self.state.borrow().output.clone();
        output.ok_or(CoreError::NoOutput)?.save(dest)
    }

    fn fail(&mut self, error: CoreError) -> CoreResult<()> {
        debug!("Conversion not started: {error}");
        self.state.borrow_mut().error = Some(error.to_string());
        Err(error)
    }
}
