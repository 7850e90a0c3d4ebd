//! Terminal prompters for the wizards.
//!
//! [`DialoguerPrompter`] asks on the terminal. [`PresetPrompter`] answers
//! from command-line flags first and falls back to an interactive prompter,
//! if there is one.

use std::collections::HashMap;
use std::io::{self, IsTerminal};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};
use tracing::debug;

use appscale_wizard::{
    ConfirmRequest, InputRequest, PickRequest, Prompter, ValidationError, WizardError,
    WizardResult,
};

/// Interactive prompter backed by `dialoguer`. Esc on a selection or Ctrl-C
/// cancels.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    /// `None` when stdin is not a terminal.
    pub fn for_terminal() -> Option<Self> {
        std::io::stdin().is_terminal().then(|| Self {
            theme: ColorfulTheme::default(),
        })
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&mut self, request: &InputRequest<'_>) -> WizardResult<String> {
        let answer = if request.password {
            Password::with_theme(&self.theme)
                .with_prompt(&request.prompt)
                .allow_empty_password(true)
                .interact()
        } else {
            let mut input = Input::<String>::with_theme(&self.theme)
                .with_prompt(&request.prompt)
                .allow_empty(true);
            if let Some(initial) = request.initial.as_deref() {
                input = input.with_initial_text(initial);
            }
            input.interact_text()
        };
        answer.map_err(terminal_error)
    }

    fn pick(&mut self, request: &PickRequest<'_>) -> WizardResult<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(&request.placeholder)
            .items(request.items)
            .default(0)
            .interact_opt()
            .map_err(terminal_error)?
            .ok_or(WizardError::Cancelled)
    }

    fn confirm(&mut self, request: &ConfirmRequest) -> WizardResult<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(&request.message)
            .default(false)
            .interact_opt()
            .map_err(terminal_error)?
            .ok_or(WizardError::Cancelled)
    }

    fn rejected(&mut self, _key: &'static str, error: &ValidationError) {
        eprintln!("  {error}");
    }
}

/// Ctrl-C surfaces as an interrupted read and cancels; any other terminal
/// failure is a prompt error.
fn terminal_error(err: dialoguer::Error) -> WizardError {
    match err {
        dialoguer::Error::IO(ref source) if source.kind() == io::ErrorKind::Interrupted => {
            WizardError::Cancelled
        }
        err => WizardError::Prompt(err.to_string()),
    }
}

/// Answers prompts from flag values keyed by prompt key. Each preset is used
/// once. A preset that fails validation ends the run instead of re-asking.
pub struct PresetPrompter<P> {
    presets: HashMap<&'static str, String>,
    fallback: Option<P>,
    last_preset: Option<&'static str>,
    rejected_preset: Option<ValidationError>,
}

impl<P: Prompter> PresetPrompter<P> {
    pub fn new(fallback: Option<P>) -> Self {
        Self {
            presets: HashMap::new(),
            fallback,
            last_preset: None,
            rejected_preset: None,
        }
    }

    /// Pre-answer `key` when `value` is set.
    pub fn preset(mut self, key: &'static str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.presets.insert(key, value);
        }
        self
    }

    fn take(&mut self, key: &'static str) -> Option<String> {
        let value = self.presets.remove(key);
        self.last_preset = value.as_ref().map(|_| key);
        if value.is_some() {
            debug!(key, "answered from flag");
        }
        value
    }

    fn fallback(&mut self, key: &'static str) -> WizardResult<&mut P> {
        self.last_preset = None;
        self.fallback.as_mut().ok_or_else(|| {
            WizardError::Prompt(format!(
                "no value for {key:?} and stdin is not a terminal; pass it as a flag"
            ))
        })
    }
}

impl<P: Prompter> Prompter for PresetPrompter<P> {
    fn input(&mut self, request: &InputRequest<'_>) -> WizardResult<String> {
        if let Some(err) = self.rejected_preset.take() {
            return Err(WizardError::Validation(err));
        }
        match self.take(request.key) {
            Some(value) => Ok(value),
            None => self.fallback(request.key)?.input(request),
        }
    }

    fn pick(&mut self, request: &PickRequest<'_>) -> WizardResult<usize> {
        let Some(value) = self.take(request.key) else {
            return self.fallback(request.key)?.pick(request);
        };
        request
            .items
            .iter()
            .position(|item| item.eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                WizardError::Prompt(format!(
                    "{value:?} is not a valid {}; expected one of: {}",
                    request.key,
                    request.items.join(", ")
                ))
            })
    }

    fn confirm(&mut self, request: &ConfirmRequest) -> WizardResult<bool> {
        match self.take(request.key) {
            Some(value) => Ok(matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "y" | "yes" | "true"
            )),
            None => self.fallback(request.key)?.confirm(request),
        }
    }

    fn rejected(&mut self, key: &'static str, error: &ValidationError) {
        if self.last_preset == Some(key) {
            self.rejected_preset = Some(error.clone());
        } else if let Some(fallback) = self.fallback.as_mut() {
            fallback.rejected(key, error);
        }
    }
}
