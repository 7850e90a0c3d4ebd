use anyhow::Result;
use clap::Args;

use appscale_core::{ResourceRef, RuleKind, ScaleRule, ScaleTrigger};
use appscale_state::StateStore;
use appscale_wizard::prompt::keys;
use appscale_wizard::{
    AddScaleRuleContext, DeleteScaleRuleContext, WizardEnv, add_scale_rule, delete_scale_rule,
};

use super::{finish, load_app};
use crate::progress::ConsoleProgress;
use crate::prompter::{DialoguerPrompter, PresetPrompter};

/// Pre-answers for the add-scale-rule wizard.
#[derive(Debug, Default, Args)]
pub struct AddRuleArgs {
    /// Name of the new rule
    #[arg(long)]
    pub name: Option<String>,
    /// Rule kind: http or queue
    #[arg(long)]
    pub kind: Option<RuleKind>,
    /// Concurrent requests per replica (http)
    #[arg(long)]
    pub concurrent_requests: Option<String>,
    /// Queue to watch (queue)
    #[arg(long)]
    pub queue_name: Option<String>,
    /// Messages per replica (queue)
    #[arg(long)]
    pub queue_length: Option<String>,
    /// Existing secret holding the queue connection string (queue)
    #[arg(long)]
    pub secret: Option<String>,
    /// Trigger parameter the secret is passed as (queue)
    #[arg(long)]
    pub trigger_parameter: Option<String>,
}

pub async fn add(store: &StateStore, resource: ResourceRef, args: AddRuleArgs) -> Result<()> {
    let terminal = DialoguerPrompter::for_terminal();
    // The trigger parameter is optional, so a script that omits it means none.
    let trigger_parameter = args
        .trigger_parameter
        .or_else(|| terminal.is_none().then(String::new));

    let mut prompter = PresetPrompter::new(terminal)
        .preset(keys::RULE_NAME, args.name)
        .preset(keys::RULE_KIND, args.kind.map(|kind| kind.label().to_string()))
        .preset(keys::CONCURRENT_REQUESTS, args.concurrent_requests)
        .preset(keys::QUEUE_NAME, args.queue_name)
        .preset(keys::QUEUE_LENGTH, args.queue_length)
        .preset(keys::TRIGGER_PARAMETER, trigger_parameter);

    // Checked against the app's secrets when the rule is committed.
    let mut ctx = AddScaleRuleContext::new(resource);
    ctx.fields.queue.secret_ref = args.secret;
    let result = {
        let mut env = WizardEnv::new(store, &mut prompter, &ConsoleProgress);
        add_scale_rule(&mut ctx, &mut env).await
    };
    finish(result)
}

pub async fn delete(store: &StateStore, resource: ResourceRef, name: Option<String>, yes: bool) -> Result<()> {
    let mut prompter = PresetPrompter::new(DialoguerPrompter::for_terminal())
        .preset(keys::DELETE_RULE, name)
        .preset(keys::DELETE_CONFIRM, yes.then(|| "yes".to_string()));

    let mut ctx = DeleteScaleRuleContext::new(resource);
    let result = {
        let mut env = WizardEnv::new(store, &mut prompter, &ConsoleProgress);
        delete_scale_rule(&mut ctx, &mut env).await
    };
    finish(result)
}

pub fn list(store: &StateStore, resource: &ResourceRef, format: &str) -> Result<()> {
    let app = load_app(store, resource)?;
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(app.rules())?),
        _ if app.rules().is_empty() => println!("No scale rules."),
        _ => {
            for rule in app.rules() {
                println!("{}", format_rule(rule));
            }
        }
    }
    Ok(())
}

/// One-line summary of a rule.
pub fn format_rule(rule: &ScaleRule) -> String {
    let detail = match &rule.trigger {
        ScaleTrigger::Http(http) => format!("concurrentRequests={}", http.concurrent_requests),
        ScaleTrigger::AzureQueue(queue) => {
            let mut detail = format!("queue={} length={}", queue.queue_name, queue.queue_length);
            for auth in &queue.auth {
                detail.push_str(&format!(" secret={}", auth.secret_ref));
                if let Some(param) = &auth.trigger_parameter {
                    detail.push_str(&format!(" triggerParameter={param}"));
                }
            }
            detail
        }
    };
    format!("{:<20} {:<14} {detail}", rule.name, rule.kind().label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use appscale_core::{ContainerApp, HttpScaleRule, QueueScaleRule, ScaleRuleAuth};

    #[test]
    fn formats_http_rule() {
        let rule = ScaleRule {
            name: "http-scale".to_string(),
            trigger: ScaleTrigger::Http(HttpScaleRule {
                concurrent_requests: 50,
            }),
        };
        assert_eq!(
            format_rule(&rule),
            "http-scale           HTTP scaling   concurrentRequests=50"
        );
    }

    #[test]
    fn formats_queue_rule_with_auth() {
        let rule = ScaleRule {
            name: "q1".to_string(),
            trigger: ScaleTrigger::AzureQueue(QueueScaleRule {
                queue_name: "orders".to_string(),
                queue_length: 5,
                auth: vec![ScaleRuleAuth {
                    secret_ref: "conn-str".to_string(),
                    trigger_parameter: Some("connection".to_string()),
                }],
            }),
        };
        let line = format_rule(&rule);
        assert!(line.starts_with("q1 "));
        assert!(line.contains("Azure queue"));
        assert!(line.ends_with("queue=orders length=5 secret=conn-str triggerParameter=connection"));
    }

    #[tokio::test]
    async fn unknown_secret_flag_fails_without_writing() {
        let store = StateStore::open_in_memory().unwrap();
        store.put_container_app(&ContainerApp::new("rg", "worker")).unwrap();
        let args = AddRuleArgs {
            name: Some("q1".to_string()),
            kind: Some(RuleKind::Queue),
            queue_name: Some("orders".to_string()),
            queue_length: Some("5".to_string()),
            secret: Some("ghost".to_string()),
            trigger_parameter: Some(String::new()),
            ..Default::default()
        };

        let err = add(&store, ResourceRef::new("rg", "worker"), args).await.unwrap_err();
        assert!(err.to_string().contains("Secret \"ghost\" does not exist"), "{err}");
        let app = store.get_container_app("rg/worker").unwrap().unwrap();
        assert!(app.rules().is_empty());
    }
}
