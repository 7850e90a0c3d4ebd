use async_trait::async_trait;
use tracing::info;

use appscale_core::{RuleKind, ScaleTrigger};

use crate::context::{AddScaleRuleContext, WizardContext};
use crate::driver::{ExecuteStep, PromptStep, SubWizard, WizardEnv};
use crate::error::{WizardError, WizardResult};
use crate::progress::ProgressEvent;
use crate::prompt::{InputRequest, PickRequest, ask_pick, ask_validated, keys};
use crate::rule::{MergeOutcome, build_rule, integrate_rule};
use crate::steps::COMMIT_PRIORITY;
use crate::steps::queue::{QueueAuthSecretStep, QueueAuthTriggerStep, QueueLengthStep, QueueNameStep};
use crate::validate::{validate_count, validate_rule_name, validate_secret_ref};

pub struct ScaleRuleNameStep;

#[async_trait]
impl PromptStep<AddScaleRuleContext> for ScaleRuleNameStep {
    fn id(&self) -> &'static str {
        "scale-rule-name"
    }

    fn should_prompt(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.rule_name.is_none()
    }

    async fn prompt(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let name = {
            let existing = ctx.require_container_app()?.rules();
            let validate = |value: &str| validate_rule_name(value, existing);
            ask_validated(
                env.prompter,
                &InputRequest {
                    key: keys::RULE_NAME,
                    prompt: "Enter a name for the new scale rule.".to_string(),
                    initial: None,
                    password: false,
                    validate: &validate,
                },
            )?
        };
        ctx.rule_name = Some(name);
        Ok(())
    }
}

/// Picks HTTP or queue scaling and branches into that kind's prompts.
pub struct ScaleRuleKindStep;

#[async_trait]
impl PromptStep<AddScaleRuleContext> for ScaleRuleKindStep {
    fn id(&self) -> &'static str {
        "scale-rule-kind"
    }

    fn should_prompt(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.rule_kind.is_none()
    }

    async fn prompt(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let items: Vec<String> = RuleKind::ALL.iter().map(|k| k.label().to_string()).collect();
        let index = ask_pick(
            env.prompter,
            &PickRequest {
                key: keys::RULE_KIND,
                placeholder: "Choose scale type".to_string(),
                items: &items,
            },
        )?;
        ctx.rule_kind = Some(RuleKind::ALL[index]);
        Ok(())
    }

    fn sub_wizard(&self, ctx: &AddScaleRuleContext) -> Option<SubWizard<AddScaleRuleContext>> {
        let prompts: Vec<Box<dyn PromptStep<AddScaleRuleContext>>> = match ctx.rule_kind? {
            RuleKind::Http => vec![Box::new(HttpConcurrentRequestsStep)],
            RuleKind::Queue => vec![
                Box::new(QueueNameStep),
                Box::new(QueueLengthStep),
                Box::new(QueueAuthSecretStep),
                Box::new(QueueAuthTriggerStep),
            ],
        };
        Some(SubWizard::prompts(prompts))
    }
}

pub struct HttpConcurrentRequestsStep;

#[async_trait]
impl PromptStep<AddScaleRuleContext> for HttpConcurrentRequestsStep {
    fn id(&self) -> &'static str {
        "http-concurrent-requests"
    }

    fn should_prompt(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.fields.http.concurrent_requests.is_none()
    }

    async fn prompt(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let validate = |value: &str| validate_count(value).map(|_| ());
        let value = ask_validated(
            env.prompter,
            &InputRequest {
                key: keys::CONCURRENT_REQUESTS,
                prompt: "Enter the number of concurrent requests.".to_string(),
                initial: None,
                password: false,
                validate: &validate,
            },
        )?;
        ctx.fields.http.concurrent_requests = Some(value);
        Ok(())
    }
}

/// Builds the rule, merges it into the current collection and writes the
/// collection back in a single update.
pub struct AddScaleRuleStep;

#[async_trait]
impl ExecuteStep<AddScaleRuleContext> for AddScaleRuleStep {
    fn id(&self) -> &'static str {
        "add-scale-rule"
    }

    fn priority(&self) -> u32 {
        COMMIT_PRIORITY
    }

    fn should_execute(&self, _ctx: &AddScaleRuleContext) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let name = ctx
            .rule_name
            .clone()
            .ok_or_else(|| WizardError::missing("rule name"))?;
        let kind = ctx.rule_kind.ok_or_else(|| WizardError::missing("rule kind"))?;
        let rule = build_rule(&name, kind, &ctx.fields)
            .map_err(|err| WizardError::Precondition(err.to_string()))?;
        if let ScaleTrigger::AzureQueue(queue) = &rule.trigger {
            let secrets = &ctx.require_container_app()?.secrets;
            for auth in &queue.auth {
                validate_secret_ref(&auth.secret_ref, secrets)
                    .map_err(|err| WizardError::Precondition(err.to_string()))?;
            }
        }
        let resource = ctx.resource().clone();

        env.progress.report(ProgressEvent::Started(format!(
            "Adding {kind} rule \"{name}\" to \"{resource}\"..."
        )));

        let mut rules = env.client.get_scale_rules(&resource).await?;
        let outcome = integrate_rule(&mut rules, rule.clone());
        let app = env.client.update_scale_rules(&resource, &rules).await?;

        ctx.set_container_app(app);
        ctx.result_rule = Some(rule);

        match outcome {
            MergeOutcome::Appended => info!(%resource, rule = %name, %kind, "scale rule added"),
            MergeOutcome::Replaced { index } => {
                info!(%resource, rule = %name, %kind, index, "http scale rule replaced")
            }
        }
        env.progress.report(ProgressEvent::Succeeded(format!(
            "Added {kind} rule \"{name}\" to \"{resource}\"."
        )));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Answer, RecordingProgress, ScriptedPrompter};
    use crate::validate::ValidationError;
    use appscale_core::{ContainerApp, HttpScaleRule, ResourceRef, ScaleRule, ScaleTrigger};
    use appscale_state::StateStore;

    fn loaded_context(store: &StateStore) -> AddScaleRuleContext {
        let mut app = ContainerApp::new("rg", "api");
        app.template.scale.rules.push(ScaleRule {
            name: "http-scale".to_string(),
            trigger: ScaleTrigger::Http(HttpScaleRule {
                concurrent_requests: 50,
            }),
        });
        store.put_container_app(&app).unwrap();
        let mut ctx = AddScaleRuleContext::new(ResourceRef::new("rg", "api"));
        ctx.set_container_app(app);
        ctx
    }

    #[tokio::test]
    async fn name_step_rejects_existing_name_then_accepts() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = loaded_context(&store);
        let mut prompter = ScriptedPrompter::new([Answer::text("http-scale"), Answer::text(" web ")]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        ScaleRuleNameStep.prompt(&mut ctx, &mut env).await.unwrap();
        assert_eq!(ctx.rule_name.as_deref(), Some("web"));
        assert_eq!(
            prompter.rejections(),
            &[(keys::RULE_NAME, ValidationError::RuleExists("http-scale".to_string()))]
        );
    }

    #[tokio::test]
    async fn kind_step_branches_by_kind() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = loaded_context(&store);
        let mut prompter = ScriptedPrompter::new([Answer::pick("Azure queue")]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        assert!(ScaleRuleKindStep.sub_wizard(&ctx).is_none());
        ScaleRuleKindStep.prompt(&mut ctx, &mut env).await.unwrap();
        assert_eq!(ctx.rule_kind, Some(RuleKind::Queue));

        let sub = ScaleRuleKindStep.sub_wizard(&ctx).unwrap();
        let ids: Vec<&str> = sub.prompt_steps.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["queue-name", "queue-length", "queue-auth-secret", "queue-auth-trigger"]);

        ctx.rule_kind = Some(RuleKind::Http);
        let sub = ScaleRuleKindStep.sub_wizard(&ctx).unwrap();
        let ids: Vec<&str> = sub.prompt_steps.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["http-concurrent-requests"]);
    }

    #[tokio::test]
    async fn commit_without_kind_is_precondition() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = loaded_context(&store);
        ctx.rule_name = Some("web".to_string());
        let mut prompter = ScriptedPrompter::new([]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        let err = AddScaleRuleStep.execute(&mut ctx, &mut env).await.unwrap_err();
        assert!(matches!(err, WizardError::Precondition(msg) if msg.contains("rule kind")));
        assert!(progress.events().is_empty());
    }

    #[tokio::test]
    async fn commit_with_missing_field_is_precondition() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = loaded_context(&store);
        ctx.rule_name = Some("web".to_string());
        ctx.rule_kind = Some(RuleKind::Http);
        let mut prompter = ScriptedPrompter::new([]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        let err = AddScaleRuleStep.execute(&mut ctx, &mut env).await.unwrap_err();
        assert!(matches!(err, WizardError::Precondition(msg) if msg.contains("concurrent requests")));
    }

    #[tokio::test]
    async fn commit_rejects_unknown_secret_reference() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = loaded_context(&store);
        ctx.rule_name = Some("q1".to_string());
        ctx.rule_kind = Some(RuleKind::Queue);
        ctx.fields.queue.name = Some("orders".to_string());
        ctx.fields.queue.length = Some("5".to_string());
        ctx.fields.queue.secret_ref = Some("ghost".to_string());
        let mut prompter = ScriptedPrompter::new([]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        let err = AddScaleRuleStep.execute(&mut ctx, &mut env).await.unwrap_err();
        let expected = ValidationError::UnknownSecret("ghost".to_string()).to_string();
        assert!(matches!(err, WizardError::Precondition(msg) if msg == expected));
        let stored = store.get_container_app("rg/api").unwrap().unwrap();
        assert_eq!(stored.rules().len(), 1);
    }
}
