// shortform-core/tests/form_tests.rs

use shortform_core::external::ScriptedEngine;
use shortform_core::{
    ConversionManager, ConversionOptions, ConversionStatus, CoreError, EngineConfig, EngineEvent,
    FormController, FormState, InputFile,
};
use std::cell::RefCell;
use std::error::Error;
use std::fs;
use std::rc::Rc;
use tempfile::tempdir;

fn form_for(engine: &ScriptedEngine) -> FormController<ScriptedEngine> {
    let engine = engine.clone();
    FormController::new(ConversionManager::with_engine_factory(
        EngineConfig::default(),
        move || engine.clone(),
    ))
}

fn converting_engine() -> ScriptedEngine {
    ScriptedEngine::new()
        .with_events(vec![EngineEvent::Progress(0.5)])
        .with_output(b"shorts".to_vec())
}

#[test]
fn test_convert_without_file_does_not_touch_engine() -> Result<(), Box<dyn Error>> {
    let engine = converting_engine();
    let mut form = form_for(&engine);
    form.load_engine()?;

    let err = form.convert().unwrap_err();
    assert!(matches!(err, CoreError::NoInputSelected));
    assert!(engine.exec_calls().is_empty());
    assert!(engine.written_files().is_empty());
    assert_eq!(form.state().status(), ConversionStatus::Error);
    Ok(())
}

#[test]
fn test_convert_without_engine_does_not_load_it() {
    let engine = converting_engine();
    let mut form = form_for(&engine);
    form.select_file(Some(InputFile::new("clip.mp4", vec![1, 2, 3])));

    let err = form.convert().unwrap_err();
    assert!(matches!(err, CoreError::NotLoaded));
    assert_eq!(engine.load_calls(), 0);
    assert!(form.state().output.is_none());
}

#[test]
fn test_full_flow_then_download() -> Result<(), Box<dyn Error>> {
    let engine = converting_engine();
    let mut form = form_for(&engine);

    form.select_file(Some(InputFile::new("clip.mp4", vec![1, 2, 3])));
    form.load_engine()?;
    assert!(form.state().can_convert());

    let progress = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&progress);
    form.set_progress_observer(move |p| sink.borrow_mut().push(p));

    form.convert()?;
    assert_eq!(*progress.borrow(), vec![50, 100]);

    let state = form.state();
    assert_eq!(state.status(), ConversionStatus::Completed);
    assert_eq!(state.progress, 100);
    assert_eq!(state.error, None);

    let dir = tempdir()?;
    let written = form.download(dir.path())?;
    assert_eq!(written, dir.path().join("shorts-video.mp4"));
    assert_eq!(fs::read(written)?, b"shorts");
    Ok(())
}

#[test]
fn test_reset_after_completion_restores_initial_state() -> Result<(), Box<dyn Error>> {
    let engine = converting_engine();
    let mut form = form_for(&engine);
    form.select_file(Some(InputFile::new("clip.mp4", vec![1])));
    form.load_engine()?;
    form.convert()?;

    form.reset();
    let state = form.state();
    assert_eq!(
        state,
        FormState {
            engine_ready: true,
            ..FormState::default()
        }
    );
    assert_eq!(state.status(), ConversionStatus::Ready);

    let dir = tempdir()?;
    assert!(matches!(form.download(dir.path()), Err(CoreError::NoOutput)));

    // The engine stays loaded across a reset
    form.select_file(Some(InputFile::new("next.mp4", vec![2])));
    form.convert()?;
    assert_eq!(engine.load_calls(), 1);
    Ok(())
}

#[test]
fn test_failed_conversion_records_error_and_retry_clears_it() -> Result<(), Box<dyn Error>> {
    let engine = converting_engine();
    engine.fail_next_exec("encoder exploded");
    let mut form = form_for(&engine);
    form.select_file(Some(InputFile::new("clip.mp4", vec![1])));
    form.load_engine()?;

    assert!(form.convert().is_err());
    let state = form.state();
    assert!(state.output.is_none());
    assert!(state.engine_ready);
    assert!(
        state
            .error
            .as_deref()
            .is_some_and(|msg| msg.starts_with("Conversion failed: "))
    );

    form.convert()?;
    let state = form.state();
    assert_eq!(state.error, None);
    assert!(state.output.is_some());
    Ok(())
}

#[test]
fn test_selecting_new_file_discards_previous_output() -> Result<(), Box<dyn Error>> {
    let engine = converting_engine();
    let mut form = form_for(&engine);
    form.select_file(Some(InputFile::new("clip.mp4", vec![1])));
    form.load_engine()?;
    form.convert()?;

    form.select_file(Some(InputFile::new("other.mp4", vec![2])));
    assert!(form.state().output.is_none());
    Ok(())
}

#[test]
fn test_controller_options_reach_engine() -> Result<(), Box<dyn Error>> {
    let engine = converting_engine();
    let mut form = form_for(&engine).with_options(ConversionOptions::crop_profile());
    form.select_file(Some(InputFile::new("clip.mp4", vec![1])));
    form.load_engine()?;
    form.convert()?;

    let args = engine.exec_calls().remove(0);
    assert!(args.iter().any(|arg| arg.contains("crop=1080:1920")));
    Ok(())
}

#[test]
fn test_log_observer_receives_engine_lines() -> Result<(), Box<dyn Error>> {
    let engine = ScriptedEngine::new()
        .with_events(vec![EngineEvent::Log("Stream mapping:".to_string())])
        .with_output(b"shorts".to_vec());
    let mut form = form_for(&engine);

    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lines);
    form.set_log_observer(move |line| sink.borrow_mut().push(line.to_string()));

    form.select_file(Some(InputFile::new("clip.mp4", vec![1])));
    form.load_engine()?;
    form.convert()?;

    let lines = lines.borrow();
    assert!(lines[0].starts_with("ffmpeg command: "));
    assert_eq!(lines.last().map(String::as_str), Some("Stream mapping:"));
    Ok(())
}
