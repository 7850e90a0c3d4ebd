use async_trait::async_trait;
use tracing::info;

use crate::context::{DeleteScaleRuleContext, WizardContext};
use crate::driver::{ExecuteStep, PromptStep, WizardEnv};
use crate::error::{WizardError, WizardResult};
use crate::progress::ProgressEvent;
use crate::prompt::{ConfirmRequest, PickRequest, ask_pick, keys};
use crate::rule::remove_rule;
use crate::steps::COMMIT_PRIORITY;

pub struct ScaleRulePickStep;

#[async_trait]
impl PromptStep<DeleteScaleRuleContext> for ScaleRulePickStep {
    fn id(&self) -> &'static str {
        "scale-rule-pick"
    }

    fn should_prompt(&self, ctx: &DeleteScaleRuleContext) -> bool {
        ctx.rule_name.is_none()
    }

    async fn prompt(&self, ctx: &mut DeleteScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let items: Vec<String> = ctx
            .require_container_app()?
            .rules()
            .iter()
            .map(|rule| rule.name.clone())
            .collect();
        if items.is_empty() {
            return Err(WizardError::NoScaleRules(ctx.resource().to_string()));
        }
        let index = ask_pick(
            env.prompter,
            &PickRequest {
                key: keys::DELETE_RULE,
                placeholder: "Select a scale rule".to_string(),
                items: &items,
            },
        )?;
        ctx.rule_name = Some(items[index].clone());
        Ok(())
    }
}

/// Declining cancels the wizard.
pub struct DeleteConfirmationStep;

#[async_trait]
impl PromptStep<DeleteScaleRuleContext> for DeleteConfirmationStep {
    fn id(&self) -> &'static str {
        "delete-confirmation"
    }

    fn should_prompt(&self, ctx: &DeleteScaleRuleContext) -> bool {
        !ctx.confirmed
    }

    async fn prompt(&self, ctx: &mut DeleteScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let name = ctx
            .rule_name
            .as_deref()
            .ok_or_else(|| WizardError::missing("rule name"))?;
        let confirmed = env.prompter.confirm(&ConfirmRequest {
            key: keys::DELETE_CONFIRM,
            message: format!("Are you sure you want to delete scale rule \"{name}\"?"),
        })?;
        if !confirmed {
            return Err(WizardError::Cancelled);
        }
        ctx.confirmed = true;
        Ok(())
    }
}

pub struct DeleteScaleRuleStep;

#[async_trait]
impl ExecuteStep<DeleteScaleRuleContext> for DeleteScaleRuleStep {
    fn id(&self) -> &'static str {
        "delete-scale-rule"
    }

    fn priority(&self) -> u32 {
        COMMIT_PRIORITY
    }

    fn should_execute(&self, ctx: &DeleteScaleRuleContext) -> bool {
        ctx.confirmed
    }

    async fn execute(&self, ctx: &mut DeleteScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let name = ctx
            .rule_name
            .clone()
            .ok_or_else(|| WizardError::missing("rule name"))?;
        let resource = ctx.resource().clone();

        let mut rules = env.client.get_scale_rules(&resource).await?;
        let removed = remove_rule(&mut rules, &name).ok_or_else(|| WizardError::RuleNotFound(name.clone()))?;

        env.progress.report(ProgressEvent::Started(format!(
            "Deleting rule \"{name}\" from \"{resource}\"..."
        )));
        let app = env.client.update_scale_rules(&resource, &rules).await?;

        ctx.set_container_app(app);
        ctx.removed_rule = Some(removed);

        info!(%resource, rule = %name, remaining = rules.len(), "scale rule deleted");
        env.progress.report(ProgressEvent::Succeeded(format!(
            "Deleted rule \"{name}\" from \"{resource}\"."
        )));
        Ok(())
    }
}
