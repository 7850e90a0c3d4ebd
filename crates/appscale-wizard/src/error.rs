//! Error types for wizard runs and the remote client boundary.

use appscale_state::StateError;
use thiserror::Error;

use crate::validate::ValidationError;

pub type ClientResult<T> = Result<T, ClientError>;

pub type WizardResult<T> = Result<T, WizardError>;

/// Failures reported by a [`ContainerAppClient`](crate::ContainerAppClient).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("container app {0} not found")]
    NotFound(String),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Why a wizard run ended without completing.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The user aborted a prompt. Nothing was committed.
    #[error("wizard cancelled")]
    Cancelled,

    /// Only escapes a prompt step when a pre-supplied answer is rejected.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// An execute step ran with a missing or invalid context field.
    #[error("wizard precondition failed: {0}")]
    Precondition(String),

    #[error("remote operation failed: {0}")]
    Remote(#[from] ClientError),

    #[error("container app {0} has no scale rules")]
    NoScaleRules(String),

    #[error("scale rule {0:?} not found")]
    RuleNotFound(String),

    /// The input surface itself failed.
    #[error("input failed: {0}")]
    Prompt(String),
}

impl WizardError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WizardError::Cancelled)
    }

    pub(crate) fn missing(field: &str) -> Self {
        WizardError::Precondition(format!("{field} is not set"))
    }
}
