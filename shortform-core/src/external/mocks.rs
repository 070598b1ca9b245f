//! In-memory `Engine` whose behavior is scripted up front.
//!
//! Clones share state, so a test can hand a clone to a `ConversionManager`
//! factory and inspect the recorded calls afterwards.

use super::{Engine, EngineEvent, ensure_plain_file_name};
use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

#[derive(Debug, Default)]
struct ScriptState {
    files: BTreeMap<String, Vec<u8>>,
    load_calls: usize,
    load_failures: VecDeque<String>,
    exec_failures: VecDeque<String>,
    events: Vec<EngineEvent>,
    output: Option<Vec<u8>>,
    exec_calls: Vec<Vec<String>>,
    written: Vec<String>,
    deleted: Vec<String>,
}

/// Engine double that emits scripted events and produces scripted output.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written to the output file (the last argument) by each exec.
    pub fn with_output(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.state.borrow_mut().output = Some(bytes.into());
        self
    }

    /// Events emitted, in order, by each exec.
    pub fn with_events(self, events: Vec<EngineEvent>) -> Self {
        self.state.borrow_mut().events = events;
        self
    }

    /// Makes the next `load` fail with `message`.
    pub fn fail_next_load(&self, message: &str) {
        self.state
            .borrow_mut()
            .load_failures
            .push_back(message.to_string());
    }

    /// Makes the next `exec` fail with `message` after emitting its events.
    pub fn fail_next_exec(&self, message: &str) {
        self.state
            .borrow_mut()
            .exec_failures
            .push_back(message.to_string());
    }

    pub fn load_calls(&self) -> usize {
        self.state.borrow().load_calls
    }

    pub fn exec_calls(&self) -> Vec<Vec<String>> {
        self.state.borrow().exec_calls.clone()
    }

    /// Names passed to `write_file`, in call order.
    pub fn written_files(&self) -> Vec<String> {
        self.state.borrow().written.clone()
    }

    /// Names passed to `delete_file`, in call order.
    pub fn deleted_files(&self) -> Vec<String> {
        self.state.borrow().deleted.clone()
    }

    /// Names currently present in the workspace.
    pub fn file_names(&self) -> Vec<String> {
        self.state.borrow().files.keys().cloned().collect()
    }
}

impl Engine for ScriptedEngine {
    fn load(&mut self, _config: &EngineConfig) -> CoreResult<()> {
        let mut state = self.state.borrow_mut();
        state.load_calls += 1;
        match state.load_failures.pop_front() {
            Some(message) => Err(CoreError::EngineBootstrap(anyhow::anyhow!(message))),
            None => Ok(()),
        }
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> CoreResult<()> {
        ensure_plain_file_name(name)?;
        let mut state = self.state.borrow_mut();
        state.written.push(name.to_string());
        state.files.insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn exec(&mut self, args: &[String], on_event: &mut dyn FnMut(EngineEvent)) -> CoreResult<()> {
        let (events, failure, output) = {
            let mut state = self.state.borrow_mut();
            state.exec_calls.push(args.to_vec());
            (
                state.events.clone(),
                state.exec_failures.pop_front(),
                state.output.clone(),
            )
        };

        // Callbacks run with the state unborrowed so they may inspect the engine
        for event in events {
            on_event(event);
        }

        if let Some(message) = failure {
            log::warn!("ScriptedEngine simulating exec failure: {message}");
            return Err(CoreError::OperationFailed(message));
        }

        if let (Some(bytes), Some(output_name)) = (output, args.last()) {
            ensure_plain_file_name(output_name)?;
            self.state
                .borrow_mut()
                .files
                .insert(output_name.clone(), bytes);
        }
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> CoreResult<Vec<u8>> {
        ensure_plain_file_name(name)?;
        self.state
            .borrow()
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::FileNotFound(name.to_string()))
    }

    fn delete_file(&mut self, name: &str) -> CoreResult<()> {
        ensure_plain_file_name(name)?;
        let mut state = self.state.borrow_mut();
        state.deleted.push(name.to_string());
        state
            .files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CoreError::FileNotFound(name.to_string()))
    }
}
