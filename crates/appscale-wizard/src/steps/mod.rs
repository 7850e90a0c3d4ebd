//! Prompt and execute steps for the scale wizards.

mod add_rule;
mod delete_rule;
mod load;
mod queue;
mod scale_range;

pub use add_rule::{AddScaleRuleStep, HttpConcurrentRequestsStep, ScaleRuleKindStep, ScaleRuleNameStep};
pub use delete_rule::{DeleteConfirmationStep, DeleteScaleRuleStep, ScaleRulePickStep};
pub use load::LoadContainerAppStep;
pub use queue::{
    CREATE_SECRET_LABEL, QueueAuthSecretCreateStep, QueueAuthSecretStep, QueueAuthTriggerStep,
    QueueLengthStep, QueueNameStep, SecretNameStep, SecretValueStep,
};
pub use scale_range::{ScaleRangePromptStep, ScaleRangeUpdateStep};

/// Priority of the step that commits a wizard's change.
pub const COMMIT_PRIORITY: u32 = 200;
