//! Scripted collaborators for driving wizards without a terminal.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{WizardError, WizardResult};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::prompt::{ConfirmRequest, InputRequest, PickRequest, Prompter};
use crate::validate::ValidationError;

/// One scripted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    /// Choose the item with this exact label.
    Pick(String),
    Confirm(bool),
    Cancel,
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    pub fn pick(label: impl Into<String>) -> Self {
        Answer::Pick(label.into())
    }
}

/// Answers prompts from a fixed script. Running out of answers cancels.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<&'static str>,
    rejections: Vec<(&'static str, ValidationError)>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Prompt keys in the order they were asked.
    pub fn asked(&self) -> &[&'static str] {
        &self.asked
    }

    pub fn rejections(&self) -> &[(&'static str, ValidationError)] {
        &self.rejections
    }

    fn next(&mut self, key: &'static str) -> WizardResult<Answer> {
        self.asked.push(key);
        match self.answers.pop_front() {
            None | Some(Answer::Cancel) => Err(WizardError::Cancelled),
            Some(answer) => Ok(answer),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, request: &InputRequest<'_>) -> WizardResult<String> {
        match self.next(request.key)? {
            Answer::Text(value) => Ok(value),
            other => Err(WizardError::Prompt(format!(
                "{}: expected text, script has {other:?}",
                request.key
            ))),
        }
    }

    fn pick(&mut self, request: &PickRequest<'_>) -> WizardResult<usize> {
        match self.next(request.key)? {
            Answer::Pick(label) => request
                .items
                .iter()
                .position(|item| *item == label)
                .ok_or_else(|| {
                    WizardError::Prompt(format!("{}: no item labelled {label:?}", request.key))
                }),
            other => Err(WizardError::Prompt(format!(
                "{}: expected pick, script has {other:?}",
                request.key
            ))),
        }
    }

    fn confirm(&mut self, request: &ConfirmRequest) -> WizardResult<bool> {
        match self.next(request.key)? {
            Answer::Confirm(yes) => Ok(yes),
            other => Err(WizardError::Prompt(format!(
                "{}: expected confirm, script has {other:?}",
                request.key
            ))),
        }
    }

    fn rejected(&mut self, key: &'static str, error: &ValidationError) {
        self.rejections.push((key, error.clone()));
    }
}

/// Keeps every reported event.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
