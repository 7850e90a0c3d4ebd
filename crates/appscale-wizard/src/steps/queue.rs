//! Azure queue rule prompts, including creating the auth secret inline.

use async_trait::async_trait;
use tracing::info;

use appscale_core::{RuleKind, Secret};

use crate::context::{AddScaleRuleContext, WizardContext};
use crate::driver::{ExecuteStep, PromptStep, SubWizard, WizardEnv};
use crate::error::{WizardError, WizardResult};
use crate::progress::ProgressEvent;
use crate::prompt::{InputRequest, PickRequest, ask_pick, ask_validated, keys};
use crate::validate::{
    ValidationResult, validate_count, validate_queue_name, validate_secret_name,
    validate_secret_value,
};

/// First item of the secret picker.
pub const CREATE_SECRET_LABEL: &str = "Create a secret";

/// Runs before the rule commit so the rule can reference the new secret.
const CREATE_SECRET_PRIORITY: u32 = 190;

pub struct QueueNameStep;

#[async_trait]
impl PromptStep<AddScaleRuleContext> for QueueNameStep {
    fn id(&self) -> &'static str {
        "queue-name"
    }

    fn should_prompt(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.fields.queue.name.is_none()
    }

    async fn prompt(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let value = ask_validated(
            env.prompter,
            &InputRequest {
                key: keys::QUEUE_NAME,
                prompt: "Enter a name for the queue.".to_string(),
                initial: None,
                password: false,
                validate: &validate_queue_name,
            },
        )?;
        ctx.fields.queue.name = Some(value);
        Ok(())
    }
}

pub struct QueueLengthStep;

#[async_trait]
impl PromptStep<AddScaleRuleContext> for QueueLengthStep {
    fn id(&self) -> &'static str {
        "queue-length"
    }

    fn should_prompt(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.fields.queue.length.is_none()
    }

    async fn prompt(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let validate = |value: &str| validate_count(value).map(|_| ());
        let value = ask_validated(
            env.prompter,
            &InputRequest {
                key: keys::QUEUE_LENGTH,
                prompt: "Enter a queue length.".to_string(),
                initial: None,
                password: false,
                validate: &validate,
            },
        )?;
        ctx.fields.queue.length = Some(value);
        Ok(())
    }
}

/// Picks an existing secret for queue auth, or branches into creating one.
pub struct QueueAuthSecretStep;

#[async_trait]
impl PromptStep<AddScaleRuleContext> for QueueAuthSecretStep {
    fn id(&self) -> &'static str {
        "queue-auth-secret"
    }

    fn should_prompt(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.fields.queue.secret_ref.is_none() && ctx.new_secret_name.is_none()
    }

    async fn prompt(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let items: Vec<String> = std::iter::once(CREATE_SECRET_LABEL)
            .chain(ctx.require_container_app()?.secret_names())
            .map(str::to_string)
            .collect();
        let index = ask_pick(
            env.prompter,
            &PickRequest {
                key: keys::QUEUE_SECRET,
                placeholder: "Choose a secret reference".to_string(),
                items: &items,
            },
        )?;
        if index > 0 {
            ctx.fields.queue.secret_ref = Some(items[index].clone());
        }
        Ok(())
    }

    fn sub_wizard(&self, ctx: &AddScaleRuleContext) -> Option<SubWizard<AddScaleRuleContext>> {
        if ctx.fields.queue.secret_ref.is_some() {
            return None;
        }
        Some(SubWizard {
            prompt_steps: vec![Box::new(SecretNameStep), Box::new(SecretValueStep)],
            execute_steps: vec![Box::new(QueueAuthSecretCreateStep)],
        })
    }
}

/// Optional trigger parameter; an empty answer means none.
pub struct QueueAuthTriggerStep;

#[async_trait]
impl PromptStep<AddScaleRuleContext> for QueueAuthTriggerStep {
    fn id(&self) -> &'static str {
        "queue-auth-trigger"
    }

    fn should_prompt(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.fields.queue.trigger_parameter.is_none()
    }

    async fn prompt(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let accept_any = |_: &str| -> ValidationResult { Ok(()) };
        let value = ask_validated(
            env.prompter,
            &InputRequest {
                key: keys::TRIGGER_PARAMETER,
                prompt: "Enter a corresponding trigger parameter (optional).".to_string(),
                initial: None,
                password: false,
                validate: &accept_any,
            },
        )?;
        ctx.fields.queue.trigger_parameter = Some(value);
        Ok(())
    }
}

pub struct SecretNameStep;

#[async_trait]
impl PromptStep<AddScaleRuleContext> for SecretNameStep {
    fn id(&self) -> &'static str {
        "secret-name"
    }

    fn should_prompt(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.new_secret_name.is_none()
    }

    async fn prompt(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let name = {
            let secrets = &ctx.require_container_app()?.secrets;
            let validate = |value: &str| validate_secret_name(value, secrets);
            ask_validated(
                env.prompter,
                &InputRequest {
                    key: keys::SECRET_NAME,
                    prompt: "Enter a secret name.".to_string(),
                    initial: None,
                    password: false,
                    validate: &validate,
                },
            )?
        };
        ctx.new_secret_name = Some(name);
        Ok(())
    }
}

pub struct SecretValueStep;

#[async_trait]
impl PromptStep<AddScaleRuleContext> for SecretValueStep {
    fn id(&self) -> &'static str {
        "secret-value"
    }

    fn should_prompt(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.new_secret_value.is_none()
    }

    async fn prompt(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let value = ask_validated(
            env.prompter,
            &InputRequest {
                key: keys::SECRET_VALUE,
                prompt: "Enter a secret value.".to_string(),
                initial: None,
                password: true,
                validate: &validate_secret_value,
            },
        )?;
        ctx.new_secret_value = Some(value);
        Ok(())
    }
}

/// Adds the new secret to the container app and points the queue rule at it.
pub struct QueueAuthSecretCreateStep;

#[async_trait]
impl ExecuteStep<AddScaleRuleContext> for QueueAuthSecretCreateStep {
    fn id(&self) -> &'static str {
        "queue-auth-secret-create"
    }

    fn priority(&self) -> u32 {
        CREATE_SECRET_PRIORITY
    }

    fn should_execute(&self, ctx: &AddScaleRuleContext) -> bool {
        ctx.rule_kind == Some(RuleKind::Queue)
            && ctx.fields.queue.secret_ref.is_none()
            && ctx.new_secret_name.is_some()
    }

    async fn execute(&self, ctx: &mut AddScaleRuleContext, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let name = ctx
            .new_secret_name
            .clone()
            .ok_or_else(|| WizardError::missing("secret name"))?;
        let value = ctx
            .new_secret_value
            .clone()
            .ok_or_else(|| WizardError::missing("secret value"))?;
        let resource = ctx.resource().clone();

        env.progress
            .report(ProgressEvent::Started("Configuring secret...".to_string()));
        let app = env
            .client
            .add_secret(
                &resource,
                Secret {
                    name: name.clone(),
                    value: Some(value),
                },
            )
            .await?;

        ctx.set_container_app(app);
        ctx.fields.queue.secret_ref = Some(name.clone());

        info!(%resource, secret = %name, "secret added");
        env.progress.report(ProgressEvent::Succeeded(format!(
            "Added secret \"{name}\" to container app \"{resource}\"."
        )));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Answer, RecordingProgress, ScriptedPrompter};
    use crate::validate::ValidationError;
    use appscale_core::{ContainerApp, ResourceRef};
    use appscale_state::StateStore;

    fn setup(store: &StateStore) -> AddScaleRuleContext {
        let mut app = ContainerApp::new("rg", "worker");
        app.secrets.push(Secret {
            name: "conn-str".to_string(),
            value: Some("DefaultEndpointsProtocol=https".to_string()),
        });
        store.put_container_app(&app).unwrap();
        let mut ctx = AddScaleRuleContext::new(ResourceRef::new("rg", "worker"));
        ctx.rule_kind = Some(RuleKind::Queue);
        ctx.set_container_app(app);
        ctx
    }

    #[tokio::test]
    async fn queue_name_rejects_upper_case_and_stays_on_step() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = setup(&store);
        let mut prompter = ScriptedPrompter::new([Answer::text("Orders"), Answer::text("orders")]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        QueueNameStep.prompt(&mut ctx, &mut env).await.unwrap();
        assert_eq!(ctx.fields.queue.name.as_deref(), Some("orders"));
        assert_eq!(prompter.asked(), &[keys::QUEUE_NAME, keys::QUEUE_NAME]);
        let (_, err) = &prompter.rejections()[0];
        assert_eq!(err, &ValidationError::InvalidQueueNameCharacters);
        assert!(err.to_string().starts_with("Invalid characters"));
    }

    #[tokio::test]
    async fn picking_existing_secret_sets_reference_without_sub_wizard() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = setup(&store);
        let mut prompter = ScriptedPrompter::new([Answer::pick("conn-str")]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        QueueAuthSecretStep.prompt(&mut ctx, &mut env).await.unwrap();
        assert_eq!(ctx.fields.queue.secret_ref.as_deref(), Some("conn-str"));
        assert!(QueueAuthSecretStep.sub_wizard(&ctx).is_none());
    }

    #[tokio::test]
    async fn picking_create_branches_into_secret_prompts() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = setup(&store);
        let mut prompter = ScriptedPrompter::new([Answer::pick(CREATE_SECRET_LABEL)]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        QueueAuthSecretStep.prompt(&mut ctx, &mut env).await.unwrap();
        assert!(ctx.fields.queue.secret_ref.is_none());
        let sub = QueueAuthSecretStep.sub_wizard(&ctx).unwrap();
        let prompts: Vec<&str> = sub.prompt_steps.iter().map(|s| s.id()).collect();
        let executes: Vec<(&str, u32)> = sub
            .execute_steps
            .iter()
            .map(|s| (s.id(), s.priority()))
            .collect();
        assert_eq!(prompts, vec!["secret-name", "secret-value"]);
        assert_eq!(executes, vec![("queue-auth-secret-create", 190)]);
    }

    #[tokio::test]
    async fn secret_name_must_be_new_case_insensitively() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = setup(&store);
        let mut prompter =
            ScriptedPrompter::new([Answer::text("conn-str"), Answer::text("queue-key")]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        SecretNameStep.prompt(&mut ctx, &mut env).await.unwrap();
        assert_eq!(ctx.new_secret_name.as_deref(), Some("queue-key"));
        assert_eq!(
            prompter.rejections(),
            &[(keys::SECRET_NAME, ValidationError::SecretExists("conn-str".to_string()))]
        );
    }

    #[tokio::test]
    async fn create_step_adds_secret_and_sets_reference() {
        let store = StateStore::open_in_memory().unwrap();
        let mut ctx = setup(&store);
        ctx.new_secret_name = Some("queue-key".to_string());
        ctx.new_secret_value = Some("s3cret".to_string());
        let mut prompter = ScriptedPrompter::new([]);
        let progress = RecordingProgress::default();
        let mut env = WizardEnv::new(&store, &mut prompter, &progress);

        assert!(QueueAuthSecretCreateStep.should_execute(&ctx));
        QueueAuthSecretCreateStep.execute(&mut ctx, &mut env).await.unwrap();

        assert_eq!(ctx.fields.queue.secret_ref.as_deref(), Some("queue-key"));
        assert!(!QueueAuthSecretCreateStep.should_execute(&ctx));
        let stored = store.get_container_app("rg/worker").unwrap().unwrap();
        let names: Vec<&str> = stored.secret_names().collect();
        assert_eq!(names, vec!["conn-str", "queue-key"]);
        assert_eq!(
            progress.events().last(),
            Some(&ProgressEvent::Succeeded(
                "Added secret \"queue-key\" to container app \"rg/worker\".".to_string()
            ))
        );
    }

    #[test]
    fn create_step_skipped_for_http_rules() {
        let mut ctx = AddScaleRuleContext::new(ResourceRef::new("rg", "api"));
        ctx.rule_kind = Some(RuleKind::Http);
        ctx.new_secret_name = Some("queue-key".to_string());
        assert!(!QueueAuthSecretCreateStep.should_execute(&ctx));
    }
}
