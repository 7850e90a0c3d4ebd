//! Input validators for the scale wizards.
//!
//! Every validator trims its input first and either accepts it or returns
//! the message to show next to the prompt. None of them perform I/O; the
//! collections they check against come from the wizard context.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use appscale_core::{ScaleRule, Secret};

pub const RULE_NAME_MIN_LEN: usize = 2;
pub const RULE_NAME_MAX_LEN: usize = 20;
pub const SECRET_NAME_MAX_LEN: usize = 253;
/// Largest value accepted for queue length and concurrent requests.
pub const MAX_COUNT: u32 = i32::MAX as u32;

static RULE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("rule name pattern"));
static QUEUE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]([-a-z0-9]*[a-z0-9])?$").expect("queue name pattern"));
static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]*$").expect("count pattern"));
static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}-\d{1,2}$").expect("range pattern"));

/// A rejected input. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A value is required to proceed.")]
    Required,

    #[error(
        "Invalid characters: a name must consist of lower case alphanumeric characters or '-', \
         and must start and end with an alphanumeric character."
    )]
    InvalidNameCharacters,

    #[error(
        "Invalid characters: a queue name must start with a lower case letter, consist of lower \
         case alphanumeric characters or '-', and end with an alphanumeric character."
    )]
    InvalidQueueNameCharacters,

    #[error("The name must be between {min} and {max} characters.")]
    InvalidLength { min: usize, max: usize },

    #[error("The scale rule \"{0}\" already exists. Please enter a unique name.")]
    RuleExists(String),

    #[error("The value must be a positive whole number.")]
    NotAPositiveInteger,

    #[error("The value must be less than or equal to {max}.")]
    TooLarge { max: u32 },

    #[error("Secret \"{0}\" does not exist on the container app.")]
    UnknownSecret(String),

    #[error("Secret with name \"{0}\" already exists.")]
    SecretExists(String),

    #[error("Please enter the range in the following format \"0-10\".")]
    RangeFormat,

    #[error("The maximum number of replicas is {max}.")]
    ReplicaCeiling { max: u32 },

    #[error("The minimum range cannot be larger than the maximum range.")]
    MinAboveMax,

    #[error("The maximum replicas must be greater than 0.")]
    MaxIsZero,

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

pub type ValidationResult<T = ()> = Result<T, ValidationError>;

/// Rule names: lower-case alphanumerics and '-', 2-20 chars, unique among
/// `existing` (exact, case-sensitive match).
pub fn validate_rule_name(name: &str, existing: &[ScaleRule]) -> ValidationResult {
    validate_rule_name_format(name)?;
    let name = name.trim();
    if existing.iter().any(|rule| rule.name == name) {
        return Err(ValidationError::RuleExists(name.to_string()));
    }
    Ok(())
}

/// Character class and length of a rule name, without the uniqueness check.
pub fn validate_rule_name_format(name: &str) -> ValidationResult {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required);
    }
    if !RULE_NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidNameCharacters);
    }
    if !(RULE_NAME_MIN_LEN..=RULE_NAME_MAX_LEN).contains(&name.len()) {
        return Err(ValidationError::InvalidLength {
            min: RULE_NAME_MIN_LEN,
            max: RULE_NAME_MAX_LEN,
        });
    }
    Ok(())
}

pub fn validate_queue_name(name: &str) -> ValidationResult {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required);
    }
    if !QUEUE_NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidQueueNameCharacters);
    }
    Ok(())
}

/// Queue length and concurrent requests: a positive integer without a
/// leading zero, at most [`MAX_COUNT`]. Returns the parsed value.
pub fn validate_count(value: &str) -> ValidationResult<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required);
    }
    if !COUNT_RE.is_match(value) {
        return Err(ValidationError::NotAPositiveInteger);
    }
    // The pattern guarantees digits only, so a parse failure means overflow.
    match value.parse::<u32>() {
        Ok(n) if n <= MAX_COUNT => Ok(n),
        _ => Err(ValidationError::TooLarge { max: MAX_COUNT }),
    }
}

pub fn validate_secret_ref(name: &str, secrets: &[Secret]) -> ValidationResult {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required);
    }
    if !secrets.iter().any(|s| s.name == name) {
        return Err(ValidationError::UnknownSecret(name.to_string()));
    }
    Ok(())
}

/// New secret names share the rule-name character class, are at most 253
/// characters, and must not collide (case-insensitively) with an existing
/// secret.
pub fn validate_secret_name(name: &str, secrets: &[Secret]) -> ValidationResult {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required);
    }
    if name.len() > SECRET_NAME_MAX_LEN {
        return Err(ValidationError::InvalidLength {
            min: 1,
            max: SECRET_NAME_MAX_LEN,
        });
    }
    if !RULE_NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidNameCharacters);
    }
    if secrets
        .iter()
        .any(|s| s.name.trim().eq_ignore_ascii_case(name))
    {
        return Err(ValidationError::SecretExists(name.to_string()));
    }
    Ok(())
}

pub fn validate_secret_value(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::Required);
    }
    Ok(())
}

/// Replica range as `"{min}-{max}"`. Returns `(min, max)`.
pub fn validate_scale_range(range: &str, ceiling: u32) -> ValidationResult<(u32, u32)> {
    let range = range.trim();
    if !RANGE_RE.is_match(range) {
        return Err(ValidationError::RangeFormat);
    }
    let (min, max) = range.split_once('-').ok_or(ValidationError::RangeFormat)?;
    let min: u32 = min.parse().map_err(|_| ValidationError::RangeFormat)?;
    let max: u32 = max.parse().map_err(|_| ValidationError::RangeFormat)?;

    if min > ceiling || max > ceiling {
        Err(ValidationError::ReplicaCeiling { max: ceiling })
    } else if min > max {
        Err(ValidationError::MinAboveMax)
    } else if max == 0 {
        Err(ValidationError::MaxIsZero)
    } else {
        Ok((min, max))
    }
}
