//! Per-run wizard contexts.
//!
//! A context is created when a wizard starts, filled in field by field by
//! the prompt steps, and read by the execute steps. The container app
//! snapshot is loaded once by [`LoadContainerAppStep`] before any step that
//! validates against it.
//!
//! [`LoadContainerAppStep`]: crate::steps::LoadContainerAppStep

use appscale_core::{ContainerApp, ResourceRef, RuleKind, ScaleRule};

use crate::error::{WizardError, WizardResult};
use crate::rule::RuleFields;

/// State every wizard carries: the target, its loaded snapshot, and the
/// error that ended the run, if any.
#[derive(Debug, Clone)]
pub struct ResourceContext {
    pub resource: ResourceRef,
    pub container_app: Option<ContainerApp>,
    pub error: Option<String>,
}

impl ResourceContext {
    pub fn new(resource: ResourceRef) -> Self {
        Self {
            resource,
            container_app: None,
            error: None,
        }
    }
}

pub trait WizardContext: Send + 'static {
    fn resource_context(&self) -> &ResourceContext;

    fn resource_context_mut(&mut self) -> &mut ResourceContext;

    fn resource(&self) -> &ResourceRef {
        &self.resource_context().resource
    }

    fn container_app(&self) -> Option<&ContainerApp> {
        self.resource_context().container_app.as_ref()
    }

    fn set_container_app(&mut self, app: ContainerApp) {
        self.resource_context_mut().container_app = Some(app);
    }

    fn require_container_app(&self) -> WizardResult<&ContainerApp> {
        self.container_app()
            .ok_or_else(|| WizardError::missing("container app snapshot"))
    }

    fn record_error(&mut self, message: String) {
        self.resource_context_mut().error = Some(message);
    }

    fn error(&self) -> Option<&str> {
        self.resource_context().error.as_deref()
    }
}

macro_rules! impl_wizard_context {
    ($ty:ty) => {
        impl WizardContext for $ty {
            fn resource_context(&self) -> &ResourceContext {
                &self.base
            }

            fn resource_context_mut(&mut self) -> &mut ResourceContext {
                &mut self.base
            }
        }
    };
}

// ── Add scale rule ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AddScaleRuleContext {
    pub base: ResourceContext,
    pub rule_name: Option<String>,
    pub rule_kind: Option<RuleKind>,
    pub fields: RuleFields,
    /// Set when the user chose to create the auth secret instead of
    /// referencing an existing one.
    pub new_secret_name: Option<String>,
    pub new_secret_value: Option<String>,
    /// The rule committed by the execute step.
    pub result_rule: Option<ScaleRule>,
}

impl AddScaleRuleContext {
    pub fn new(resource: ResourceRef) -> Self {
        Self {
            base: ResourceContext::new(resource),
            rule_name: None,
            rule_kind: None,
            fields: RuleFields::default(),
            new_secret_name: None,
            new_secret_value: None,
            result_rule: None,
        }
    }
}

impl_wizard_context!(AddScaleRuleContext);

// ── Delete scale rule ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DeleteScaleRuleContext {
    pub base: ResourceContext,
    pub rule_name: Option<String>,
    pub confirmed: bool,
    pub removed_rule: Option<ScaleRule>,
}

impl DeleteScaleRuleContext {
    pub fn new(resource: ResourceRef) -> Self {
        Self {
            base: ResourceContext::new(resource),
            rule_name: None,
            confirmed: false,
            removed_rule: None,
        }
    }
}

impl_wizard_context!(DeleteScaleRuleContext);

// ── Scale range ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScaleRangeContext {
    pub base: ResourceContext,
    /// Highest replica count either bound may take.
    pub replica_ceiling: u32,
    pub new_min: Option<u32>,
    pub new_max: Option<u32>,
}

impl ScaleRangeContext {
    pub fn new(resource: ResourceRef, replica_ceiling: u32) -> Self {
        Self {
            base: ResourceContext::new(resource),
            replica_ceiling,
            new_min: None,
            new_max: None,
        }
    }
}

impl_wizard_context!(ScaleRangeContext);
