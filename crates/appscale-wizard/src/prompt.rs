//! The input surface the prompt steps talk to.
//!
//! A [`Prompter`] shows one prompt at a time and returns the raw answer, or
//! [`WizardError::Cancelled`] when the user backs out. Validation happens in
//! [`ask_validated`], which keeps re-asking until the answer passes, so a
//! rejected answer never advances a step.

use tracing::debug;

use crate::error::{WizardError, WizardResult};
use crate::validate::ValidationError;

/// Stable identifiers for each prompt, used to pre-answer prompts.
pub mod keys {
    pub const RULE_NAME: &str = "rule-name";
    pub const RULE_KIND: &str = "rule-kind";
    pub const CONCURRENT_REQUESTS: &str = "concurrent-requests";
    pub const QUEUE_NAME: &str = "queue-name";
    pub const QUEUE_LENGTH: &str = "queue-length";
    pub const QUEUE_SECRET: &str = "secret";
    pub const TRIGGER_PARAMETER: &str = "trigger-parameter";
    pub const SECRET_NAME: &str = "secret-name";
    pub const SECRET_VALUE: &str = "secret-value";
    pub const DELETE_RULE: &str = "rule";
    pub const DELETE_CONFIRM: &str = "confirm";
    pub const SCALE_RANGE: &str = "range";
}

pub type Validator<'a> = &'a (dyn Fn(&str) -> Result<(), ValidationError> + Sync);

/// Free-text prompt.
pub struct InputRequest<'a> {
    pub key: &'static str,
    pub prompt: String,
    /// Pre-filled text the user can edit.
    pub initial: Option<String>,
    /// Hide the typed text.
    pub password: bool,
    pub validate: Validator<'a>,
}

/// Single choice among `items`. The answer is an index into `items`.
pub struct PickRequest<'a> {
    pub key: &'static str,
    pub placeholder: String,
    pub items: &'a [String],
}

/// Yes/no question.
pub struct ConfirmRequest {
    pub key: &'static str,
    pub message: String,
}

pub trait Prompter: Send {
    fn input(&mut self, request: &InputRequest<'_>) -> WizardResult<String>;

    fn pick(&mut self, request: &PickRequest<'_>) -> WizardResult<usize>;

    fn confirm(&mut self, request: &ConfirmRequest) -> WizardResult<bool>;

    /// Called when an answer to `key` failed validation, before re-asking.
    fn rejected(&mut self, key: &'static str, error: &ValidationError);
}

/// Ask until the trimmed answer passes `request.validate`.
pub fn ask_validated(prompter: &mut dyn Prompter, request: &InputRequest<'_>) -> WizardResult<String> {
    loop {
        let raw = prompter.input(request)?;
        let value = raw.trim();
        match (request.validate)(value) {
            Ok(()) => return Ok(value.to_string()),
            Err(err) => {
                debug!(key = request.key, error = %err, "input rejected");
                prompter.rejected(request.key, &err);
            }
        }
    }
}

/// Pick and check the index is in range.
pub fn ask_pick(prompter: &mut dyn Prompter, request: &PickRequest<'_>) -> WizardResult<usize> {
    let index = prompter.pick(request)?;
    if index >= request.items.len() {
        return Err(WizardError::Prompt(format!(
            "choice {index} out of range for {}",
            request.key
        )));
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Answer, ScriptedPrompter};

    fn no_dashes(value: &str) -> Result<(), ValidationError> {
        if value.contains('-') {
            Err(ValidationError::InvalidNameCharacters)
        } else {
            Ok(())
        }
    }

    #[test]
    fn ask_validated_retries_until_valid_and_trims() {
        let mut prompter = ScriptedPrompter::new([
            Answer::text("a-b"),
            Answer::text("  ab  "),
        ]);
        let request = InputRequest {
            key: "k",
            prompt: "name".to_string(),
            initial: None,
            password: false,
            validate: &no_dashes,
        };
        assert_eq!(ask_validated(&mut prompter, &request).unwrap(), "ab");
        assert_eq!(
            prompter.rejections(),
            &[("k", ValidationError::InvalidNameCharacters)]
        );
    }

    #[test]
    fn ask_validated_propagates_cancel() {
        let mut prompter = ScriptedPrompter::new([Answer::text("a-b"), Answer::Cancel]);
        let request = InputRequest {
            key: "k",
            prompt: "name".to_string(),
            initial: None,
            password: false,
            validate: &no_dashes,
        };
        assert!(ask_validated(&mut prompter, &request).unwrap_err().is_cancelled());
    }

    #[test]
    fn ask_pick_rejects_out_of_range() {
        struct Wild;
        impl Prompter for Wild {
            fn input(&mut self, _: &InputRequest<'_>) -> WizardResult<String> {
                Err(WizardError::Cancelled)
            }
            fn pick(&mut self, _: &PickRequest<'_>) -> WizardResult<usize> {
                Ok(7)
            }
            fn confirm(&mut self, _: &ConfirmRequest) -> WizardResult<bool> {
                Ok(false)
            }
            fn rejected(&mut self, _: &'static str, _: &ValidationError) {}
        }

        let items = vec!["a".to_string()];
        let request = PickRequest {
            key: "k",
            placeholder: "choose".to_string(),
            items: &items,
        };
        assert!(matches!(
            ask_pick(&mut Wild, &request),
            Err(WizardError::Prompt(_))
        ));
    }
}
