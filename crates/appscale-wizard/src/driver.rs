//! Wizard driver: sequences prompt steps, then execute steps.
//!
//! Prompt steps run in order. After each one (whether or not it had to
//! prompt) its sub-wizard, if any, is spliced in: the sub-wizard's prompt
//! steps run next, and its execute steps join the execute phase. Execute
//! steps run by ascending priority once every prompt has been answered.
//!
//! Any error ends the run. Cancellation ends it quietly; everything else is
//! recorded in the context and reported as a failure.

use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::client::ContainerAppClient;
use crate::context::WizardContext;
use crate::error::{WizardError, WizardResult};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::prompt::Prompter;

/// Collaborators a wizard run talks to.
pub struct WizardEnv<'a> {
    pub client: &'a dyn ContainerAppClient,
    pub prompter: &'a mut dyn Prompter,
    pub progress: &'a dyn ProgressSink,
}

impl<'a> WizardEnv<'a> {
    pub fn new(
        client: &'a dyn ContainerAppClient,
        prompter: &'a mut dyn Prompter,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            client,
            prompter,
            progress,
        }
    }
}

/// Extra steps contributed by a prompt step once it has an answer.
pub struct SubWizard<C: WizardContext> {
    pub prompt_steps: Vec<Box<dyn PromptStep<C>>>,
    pub execute_steps: Vec<Box<dyn ExecuteStep<C>>>,
}

impl<C: WizardContext> SubWizard<C> {
    pub fn prompts(prompt_steps: Vec<Box<dyn PromptStep<C>>>) -> Self {
        Self {
            prompt_steps,
            execute_steps: Vec::new(),
        }
    }
}

#[async_trait]
pub trait PromptStep<C: WizardContext>: Send + Sync {
    fn id(&self) -> &'static str;

    /// False when the field this step fills is already set.
    fn should_prompt(&self, ctx: &C) -> bool;

    async fn prompt(&self, ctx: &mut C, env: &mut WizardEnv<'_>) -> WizardResult<()>;

    fn sub_wizard(&self, _ctx: &C) -> Option<SubWizard<C>> {
        None
    }
}

#[async_trait]
pub trait ExecuteStep<C: WizardContext>: Send + Sync {
    fn id(&self) -> &'static str;

    /// Lower runs first.
    fn priority(&self) -> u32;

    fn should_execute(&self, ctx: &C) -> bool;

    async fn execute(&self, ctx: &mut C, env: &mut WizardEnv<'_>) -> WizardResult<()>;
}

pub struct Wizard<'c, C: WizardContext> {
    title: String,
    context: &'c mut C,
    prompt_steps: VecDeque<Box<dyn PromptStep<C>>>,
    execute_steps: Vec<Box<dyn ExecuteStep<C>>>,
}

impl<'c, C: WizardContext> Wizard<'c, C> {
    pub fn new(title: impl Into<String>, context: &'c mut C) -> Self {
        Self {
            title: title.into(),
            context,
            prompt_steps: VecDeque::new(),
            execute_steps: Vec::new(),
        }
    }

    pub fn prompt_step(mut self, step: impl PromptStep<C> + 'static) -> Self {
        self.prompt_steps.push_back(Box::new(step));
        self
    }

    pub fn execute_step(mut self, step: impl ExecuteStep<C> + 'static) -> Self {
        self.execute_steps.push(Box::new(step));
        self
    }

    /// Run the prompt phase, then the execute phase.
    pub async fn run(mut self, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        info!(wizard = %self.title, "wizard started");
        self.prompt(env).await?;
        self.execute(env).await?;
        info!(wizard = %self.title, "wizard completed");
        Ok(())
    }

    pub async fn prompt(&mut self, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        while let Some(step) = self.prompt_steps.pop_front() {
            if step.should_prompt(self.context) {
                debug!(wizard = %self.title, step = step.id(), "prompting");
                if let Err(err) = step.prompt(self.context, env).await {
                    return Err(self.fail(err, env));
                }
            } else {
                debug!(wizard = %self.title, step = step.id(), "already answered, skipping");
            }

            if let Some(sub) = step.sub_wizard(self.context) {
                debug!(
                    wizard = %self.title,
                    step = step.id(),
                    prompts = sub.prompt_steps.len(),
                    executes = sub.execute_steps.len(),
                    "sub-wizard added"
                );
                for sub_step in sub.prompt_steps.into_iter().rev() {
                    self.prompt_steps.push_front(sub_step);
                }
                self.execute_steps.extend(sub.execute_steps);
            }
        }
        Ok(())
    }

    pub async fn execute(&mut self, env: &mut WizardEnv<'_>) -> WizardResult<()> {
        let mut steps = std::mem::take(&mut self.execute_steps);
        steps.sort_by_key(|step| step.priority());

        for step in &steps {
            if !step.should_execute(self.context) {
                debug!(wizard = %self.title, step = step.id(), "nothing to execute, skipping");
                continue;
            }
            debug!(wizard = %self.title, step = step.id(), priority = step.priority(), "executing");
            if let Err(err) = step.execute(self.context, env).await {
                return Err(self.fail(err, env));
            }
        }
        Ok(())
    }

    fn fail(&mut self, err: WizardError, env: &WizardEnv<'_>) -> WizardError {
        if err.is_cancelled() {
            info!(wizard = %self.title, "wizard cancelled");
        } else {
            warn!(wizard = %self.title, error = %err, "wizard failed");
            self.context.record_error(err.to_string());
            env.progress
                .report(ProgressEvent::Failed(format!("{}: {err}", self.title)));
        }
        err
    }
}
