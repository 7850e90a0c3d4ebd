use async_trait::async_trait;
use tracing::info;

use crate::context::{ScaleRangeContext, WizardContext};
use crate::driver::{ExecuteStep, PromptStep, WizardEnv};
use crate::error::{WizardError, WizardResult};
use crate::progress::ProgressEvent;
use crate::prompt::{InputRequest, ask_validated, keys};
use crate::steps::COMMIT_PRIORITY;
use crate::validate::validate_scale_range;

/// Asks for `min-max`, pre-filled with the app's current bounds.
pub struct ScaleRangePromptStep;

#[async_trait]
impl PromptStep<ScaleRangeContext> for ScaleRangePromptStep {
    fn id(&self) -> &'static str {
        "scale-range"
    }

    fn should_prompt(&self, ctx: &ScaleRangeContext) -> bool {
        ctx.new_min.is_none() || ctx.new_max.is_none()
    }

    async fn prompt(&self, ctx: &mut ScaleRangeContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let ceiling = ctx.replica_ceiling;
        let scale = &ctx.require_container_app()?.template.scale;
        let current = format!(
            "{}-{}",
            scale.min_replicas.unwrap_or(0),
            scale.max_replicas.unwrap_or(ceiling)
        );

        let validate = |value: &str| validate_scale_range(value, ceiling).map(|_| ());
        let answer = ask_validated(
            env.prompter,
            &InputRequest {
                key: keys::SCALE_RANGE,
                prompt: format!(
                    "Set the range of application replicas that get created in response to a scale rule. \
                     Set any range within the minimum of 0 and the maximum of {ceiling} replicas"
                ),
                initial: Some(current),
                password: false,
                validate: &validate,
            },
        )?;
        let (min, max) = validate_scale_range(&answer, ceiling)?;
        ctx.new_min = Some(min);
        ctx.new_max = Some(max);
        Ok(())
    }
}

pub struct ScaleRangeUpdateStep;

#[async_trait]
impl ExecuteStep<ScaleRangeContext> for ScaleRangeUpdateStep {
    fn id(&self) -> &'static str {
        "scale-range-update"
    }

    fn priority(&self) -> u32 {
        COMMIT_PRIORITY
    }

    fn should_execute(&self, _ctx: &ScaleRangeContext) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut ScaleRangeContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let min = ctx.new_min.ok_or_else(|| WizardError::missing("minimum replicas"))?;
        let max = ctx.new_max.ok_or_else(|| WizardError::missing("maximum replicas"))?;
        let resource = ctx.resource().clone();

        env.progress.report(ProgressEvent::Started(format!(
            "Updating replica scaling range for \"{resource}\"..."
        )));
        let app = env.client.update_scale_range(&resource, min, max).await?;
        ctx.set_container_app(app);

        info!(%resource, min, max, "scale range updated");
        env.progress.report(ProgressEvent::Succeeded(format!(
            "Updated replica scaling range to \"{min}-{max}\" for \"{resource}\"."
        )));
        Ok(())
    }
}
