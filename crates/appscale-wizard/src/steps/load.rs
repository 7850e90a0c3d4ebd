use async_trait::async_trait;
use tracing::debug;

use crate::context::WizardContext;
use crate::driver::{PromptStep, WizardEnv};
use crate::error::WizardResult;

/// Fetches the container app once so later steps can validate against it.
/// Never asks the user anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadContainerAppStep;

#[async_trait]
impl<C: WizardContext> PromptStep<C> for LoadContainerAppStep {
    fn id(&self) -> &'static str {
        "load-container-app"
    }

    fn should_prompt(&self, ctx: &C) -> bool {
        ctx.container_app().is_none()
    }

    async fn prompt(&self, ctx: &mut C, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let resource = ctx.resource().clone();
        let app = env.client.get_container_app(&resource).await?;
        debug!(
            %resource,
            rules = app.rules().len(),
            secrets = app.secrets.len(),
            "container app loaded"
        );
        ctx.set_container_app(app);
        Ok(())
    }
}
