//! Scaling configuration types shared across appscale crates.
//!
//! These mirror the container app management API's scale template shape.
//! Field names serialize in camelCase so stored and printed documents match
//! what the remote API accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Rules ──────────────────────────────────────────────────────────

/// A single autoscaling rule attached to a container app's scale template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleRule {
    pub name: String,
    #[serde(flatten)]
    pub trigger: ScaleTrigger,
}

/// Rule payload. Exactly one variant is present per rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleTrigger {
    #[serde(rename = "http")]
    Http(HttpScaleRule),
    #[serde(rename = "azureQueue")]
    AzureQueue(QueueScaleRule),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpScaleRule {
    pub concurrent_requests: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueScaleRule {
    pub queue_name: String,
    pub queue_length: u32,
    #[serde(default)]
    pub auth: Vec<ScaleRuleAuth>,
}

/// Binds a container app secret to a trigger parameter of the scaler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRuleAuth {
    pub secret_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_parameter: Option<String>,
}

impl ScaleRule {
    pub fn kind(&self) -> RuleKind {
        match self.trigger {
            ScaleTrigger::Http(_) => RuleKind::Http,
            ScaleTrigger::AzureQueue(_) => RuleKind::Queue,
        }
    }

    pub fn is_http(&self) -> bool {
        matches!(self.trigger, ScaleTrigger::Http(_))
    }
}

/// Which kind of rule a wizard is building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Http,
    Queue,
}

impl RuleKind {
    pub const ALL: [RuleKind; 2] = [RuleKind::Http, RuleKind::Queue];

    /// Human-facing label shown in pickers and activity messages.
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::Http => "HTTP scaling",
            RuleKind::Queue => "Azure queue",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "http scaling" => Ok(RuleKind::Http),
            "queue" | "azure-queue" | "azure queue" => Ok(RuleKind::Queue),
            other => Err(format!("unknown rule kind: {other} (expected http or queue)")),
        }
    }
}

// ── Container app ──────────────────────────────────────────────────

/// Replica bounds plus the ordered rule collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_replicas: Option<u32>,
    #[serde(default)]
    pub rules: Vec<ScaleRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub scale: Scale,
}

/// A container app secret. Values are write-only from the wizard's view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerApp {
    pub resource_group: String,
    pub name: String,
    #[serde(default)]
    pub template: Template,
    #[serde(default)]
    pub secrets: Vec<Secret>,
    /// Unix timestamp (seconds) of the last committed update.
    #[serde(default)]
    pub updated_at: u64,
}

impl ContainerApp {
    pub fn new(resource_group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_group: resource_group.into(),
            name: name.into(),
            template: Template::default(),
            secrets: Vec::new(),
            updated_at: 0,
        }
    }

    pub fn table_key(&self) -> String {
        format!("{}/{}", self.resource_group, self.name)
    }

    pub fn rules(&self) -> &[ScaleRule] {
        &self.template.scale.rules
    }

    pub fn secret_names(&self) -> impl Iterator<Item = &str> {
        self.secrets.iter().map(|s| s.name.as_str())
    }

    /// Copy with secret values stripped, for display.
    pub fn redacted(&self) -> Self {
        let mut app = self.clone();
        for secret in &mut app.secrets {
            secret.value = None;
        }
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_rule_shape() {
        let rule = ScaleRule {
            name: "http-scale".to_string(),
            trigger: ScaleTrigger::Http(HttpScaleRule {
                concurrent_requests: 50,
            }),
        };
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({"name": "http-scale", "http": {"concurrentRequests": 50}})
        );
    }

    #[test]
    fn test_queue_rule_shape_omits_missing_trigger_parameter() {
        let rule = ScaleRule {
            name: "q1".to_string(),
            trigger: ScaleTrigger::AzureQueue(QueueScaleRule {
                queue_name: "orders".to_string(),
                queue_length: 5,
                auth: vec![ScaleRuleAuth {
                    secret_ref: "conn-str".to_string(),
                    trigger_parameter: None,
                }],
            }),
        };
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "name": "q1",
                "azureQueue": {
                    "queueName": "orders",
                    "queueLength": 5,
                    "auth": [{"secretRef": "conn-str"}]
                }
            })
        );
    }

    #[test]
    fn test_rule_parses_from_api_document() {
        let rule: ScaleRule = serde_json::from_value(json!({
            "name": "q2",
            "azureQueue": {"queueName": "jobs", "queueLength": 10,
                           "auth": [{"secretRef": "s", "triggerParameter": "connection"}]}
        }))
        .unwrap();
        assert_eq!(rule.kind(), RuleKind::Queue);
        assert!(!rule.is_http());
    }

    #[test]
    fn test_rule_kind_from_str() {
        assert_eq!("http".parse::<RuleKind>().unwrap(), RuleKind::Http);
        assert_eq!("Queue".parse::<RuleKind>().unwrap(), RuleKind::Queue);
        assert!("cpu".parse::<RuleKind>().is_err());
    }

    #[test]
    fn test_redacted_strips_secret_values() {
        let mut app = ContainerApp::new("rg", "api");
        app.secrets.push(Secret {
            name: "conn-str".to_string(),
            value: Some("hunter2".to_string()),
        });
        let shown = app.redacted();
        assert_eq!(shown.secrets[0].value, None);
        assert_eq!(shown.secret_names().collect::<Vec<_>>(), vec!["conn-str"]);
    }
}
