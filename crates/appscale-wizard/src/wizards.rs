//! Entry points that assemble and run each wizard.

use crate::context::{AddScaleRuleContext, DeleteScaleRuleContext, ScaleRangeContext};
use crate::driver::{Wizard, WizardEnv};
use crate::error::WizardResult;
use crate::steps::{
    AddScaleRuleStep, DeleteConfirmationStep, DeleteScaleRuleStep, LoadContainerAppStep,
    ScaleRangePromptStep, ScaleRangeUpdateStep, ScaleRuleKindStep, ScaleRuleNameStep,
    ScaleRulePickStep,
};

/// Add a scale rule to `ctx.base.resource`. Fields already set on `ctx` are
/// not prompted for; they are validated when the rule is committed.
pub async fn add_scale_rule(ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
    let title = format!("Add scale rule to \"{}\"", ctx.base.resource);
    Wizard::new(title, ctx)
        .prompt_step(LoadContainerAppStep)
        .prompt_step(ScaleRuleNameStep)
        .prompt_step(ScaleRuleKindStep)
        .execute_step(AddScaleRuleStep)
        .run(env)
        .await
}

pub async fn delete_scale_rule(
    ctx: &mut DeleteScaleRuleContext,
    env: &mut WizardEnv<'_>,
) -> WizardResult<()> {
    let title = format!("Delete scale rule from \"{}\"", ctx.base.resource);
    Wizard::new(title, ctx)
        .prompt_step(LoadContainerAppStep)
        .prompt_step(ScaleRulePickStep)
        .prompt_step(DeleteConfirmationStep)
        .execute_step(DeleteScaleRuleStep)
        .run(env)
        .await
}

pub async fn edit_scale_range(ctx: &mut ScaleRangeContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
    let title = format!("Update replica scaling range for \"{}\"", ctx.base.resource);
    Wizard::new(title, ctx)
        .prompt_step(LoadContainerAppStep)
        .prompt_step(ScaleRangePromptStep)
        .execute_step(ScaleRangeUpdateStep)
        .run(env)
        .await
}
