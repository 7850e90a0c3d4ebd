//! Interactive wizards that edit a container app's scale
//! template.
//!
//! A wizard is a sequence of prompt steps that fill a context, followed by
//! execute steps that commit it. Every run owns its context; nothing is
//! shared between runs.
//!
//! # Flow
//!
//! ```text
//! LoadContainerApp ─► RuleName ─► RuleKind ─┬─► ConcurrentRequests                      (http)
//!                                           └─► QueueName ─► QueueLength ─► AuthSecret ─► AuthTrigger (queue)
//!                                                                              └─► SecretName ─► SecretValue (create secret)
//!
//! execute (by priority): QueueAuthSecretCreate (190) ─► AddScaleRule (200)
//! ```
//!
//! Any cancelled prompt aborts the run before the execute phase, so a
//! cancelled wizard never reaches the remote client's update calls.

pub mod client;
pub mod context;
pub mod driver;
pub mod error;
pub mod progress;
pub mod prompt;
pub mod rule;
pub mod steps;
pub mod testing;
pub mod validate;
pub mod wizards;

pub use client::ContainerAppClient;
pub use context::{
    AddScaleRuleContext, DeleteScaleRuleContext, ResourceContext, ScaleRangeContext,
    WizardContext,
};
pub use driver::{ExecuteStep, PromptStep, SubWizard, Wizard, WizardEnv};
pub use error::{ClientError, ClientResult, WizardError, WizardResult};
pub use progress::{ProgressEvent, ProgressSink};
pub use prompt::{ConfirmRequest, InputRequest, PickRequest, Prompter};
pub use rule::{HttpFields, MergeOutcome, QueueFields, RuleFields, build_rule, integrate_rule, remove_rule};
pub use validate::ValidationError;
pub use wizards::{add_scale_rule, delete_scale_rule, edit_scale_range};
