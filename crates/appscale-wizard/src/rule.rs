//! Building scale rules from wizard fields and merging them into a rule
//! collection.

use appscale_core::{
    HttpScaleRule, QueueScaleRule, RuleKind, ScaleRule, ScaleRuleAuth, ScaleTrigger,
};

use crate::validate::{
    ValidationError, ValidationResult, validate_count, validate_queue_name,
    validate_rule_name_format,
};

/// Raw (trimmed, validated) answers for an HTTP rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpFields {
    pub concurrent_requests: Option<String>,
}

/// Raw (trimmed, validated) answers for a queue rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueFields {
    pub name: Option<String>,
    pub length: Option<String>,
    pub secret_ref: Option<String>,
    pub trigger_parameter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFields {
    pub http: HttpFields,
    pub queue: QueueFields,
}

/// Where [`integrate_rule`] put the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Appended,
    Replaced { index: usize },
}

/// Build a rule of `kind` from `fields`.
///
/// Fails with [`ValidationError::MissingField`] when `fields` lacks a value
/// that `kind` requires. Every present value is re-checked, since fields set
/// before the run never went through their prompt. Name uniqueness is not
/// checked here: an HTTP rule may reuse the name of the rule it replaces.
pub fn build_rule(name: &str, kind: RuleKind, fields: &RuleFields) -> ValidationResult<ScaleRule> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingField("rule name"));
    }
    validate_rule_name_format(name)?;

    let trigger = match kind {
        RuleKind::Http => {
            let concurrent_requests = required(&fields.http.concurrent_requests, "concurrent requests")?;
            ScaleTrigger::Http(HttpScaleRule {
                concurrent_requests: validate_count(concurrent_requests)?,
            })
        }
        RuleKind::Queue => {
            let queue_name = required(&fields.queue.name, "queue name")?;
            validate_queue_name(queue_name)?;
            let queue_length = required(&fields.queue.length, "queue length")?;
            let secret_ref = required(&fields.queue.secret_ref, "secret reference")?;
            ScaleTrigger::AzureQueue(QueueScaleRule {
                queue_name: queue_name.trim().to_string(),
                queue_length: validate_count(queue_length)?,
                auth: vec![ScaleRuleAuth {
                    secret_ref: secret_ref.trim().to_string(),
                    trigger_parameter: fields
                        .queue
                        .trigger_parameter
                        .as_deref()
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string),
                }],
            })
        }
    };

    Ok(ScaleRule {
        name: name.to_string(),
        trigger,
    })
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> ValidationResult<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField(field))
}

/// Merge `rule` into `rules`.
///
/// HTTP rules replace the existing HTTP rule in place (a collection holds at
/// most one). Queue rules are always appended, even when a rule with the
/// same name or queue already exists.
pub fn integrate_rule(rules: &mut Vec<ScaleRule>, rule: ScaleRule) -> MergeOutcome {
    match rule.kind() {
        RuleKind::Http => match rules.iter().position(ScaleRule::is_http) {
            Some(index) => {
                rules[index] = rule;
                MergeOutcome::Replaced { index }
            }
            None => {
                rules.push(rule);
                MergeOutcome::Appended
            }
        },
        RuleKind::Queue => {
            rules.push(rule);
            MergeOutcome::Appended
        }
    }
}

/// Remove the first rule named `name`, preserving the order of the rest.
pub fn remove_rule(rules: &mut Vec<ScaleRule>, name: &str) -> Option<ScaleRule> {
    let index = rules.iter().position(|r| r.name == name)?;
    Some(rules.remove(index))
}
