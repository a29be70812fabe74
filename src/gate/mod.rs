//! Agent action gate
//!
//! Decides whether the assistant may navigate somewhere or interact with an
//! element on the user's behalf. Two layers:
//!
//! - **Free functions** (`can_agent_execute_action`, `validate_action_batch`,
//!   `is_path_blocked`, ...) evaluate against the built-in blocklists.
//! - **`ActionGate`** adds configured blocklist extensions, hooks and an
//!   optional audit log on top of the same decision order.
//!
//! ## Example
//!
//! ```rust
//! use safetybot_gate::core::AgentAction;
//! use safetybot_gate::gate::can_agent_execute_action;
//! use safetybot_gate::permissions::{CrudAction, CrudPermissions, FeatureModule, FeaturePermissions};
//!
//! let matrix = FeaturePermissions::new().with(FeatureModule::Capa, CrudPermissions::all());
//!
//! let create = AgentAction::click("#capa-new-button")
//!     .with_feature(FeatureModule::Capa, CrudAction::Create);
//! assert!(can_agent_execute_action(&create, &matrix).allowed);
//!
//! let settings = AgentAction::navigate("/app/settings");
//! assert!(!can_agent_execute_action(&settings, &matrix).allowed);
//! ```

mod batch;
mod blocklist;
mod element;
mod evaluator;

use std::sync::Arc;

pub use batch::{validate_action_batch, BatchValidation, DeniedAction};
pub use blocklist::{
    is_path_blocked, is_selector_blocked, Blocklist, BLOCKED_ELEMENT_ATTRIBUTE, BLOCKED_KEYWORDS,
    BLOCKED_PATHS, BLOCKED_SELECTORS,
};
pub use element::{is_element_blocked, ElementSnapshot, ElementView, SelectorError};
pub use evaluator::{
    action_requires_confirmation, can_agent_execute_action, RESTRICTED_AREA_REASON,
    RESTRICTED_ELEMENT_REASON,
};

use crate::audit::AuditLog;
use crate::config::GateConfig;
use crate::core::{ActionType, AgentAction, AgentPermissionResult, GateResult};
use crate::hooks::{HookContext, HookRegistry};
use crate::permissions::FeaturePermissions;

/// Configured action gate
///
/// Stateless apart from its configuration: every call evaluates fresh
/// against the permission snapshot it is given.
#[derive(Debug)]
pub struct ActionGate {
    blocklist: Blocklist,
    always_confirm: Vec<ActionType>,
    short_circuit_on_deny: bool,
    hooks: Option<Arc<HookRegistry>>,
    audit: Option<AuditLog>,
}

impl Default for ActionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionGate {
    /// Gate enforcing only the built-in rules
    pub fn new() -> Self {
        Self {
            blocklist: Blocklist::builtin().clone(),
            always_confirm: Vec::new(),
            short_circuit_on_deny: false,
            hooks: None,
            audit: None,
        }
    }

    /// Gate extended by a configuration
    pub fn from_config(config: &GateConfig) -> GateResult<Self> {
        config.validate()?;

        Ok(Self {
            blocklist: Blocklist::from_config(config)?,
            always_confirm: config.always_confirm.clone(),
            short_circuit_on_deny: config.short_circuit_on_deny,
            hooks: None,
            audit: config.audit_dir.clone().map(AuditLog::new),
        })
    }

    /// Attach hooks
    ///
    /// The configured short-circuit setting is applied to the registry.
    pub fn with_hooks(mut self, mut hooks: HookRegistry) -> Self {
        if self.short_circuit_on_deny {
            hooks.set_short_circuit_on_deny(true);
        }
        self.hooks = Some(Arc::new(hooks));
        self
    }

    /// Attach a shared, already configured hook registry
    pub fn with_shared_hooks(mut self, hooks: Arc<HookRegistry>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Record every decision in an audit log
    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Active blocklist
    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Evaluate one action
    ///
    /// Built-in rules first, then hooks on actions those rules allow. Audit
    /// failures are logged and never change the decision.
    pub fn evaluate(
        &self,
        action: &AgentAction,
        permissions: &FeaturePermissions,
    ) -> AgentPermissionResult {
        let mut result = evaluator::evaluate_with(&self.blocklist, action, permissions);

        if result.allowed {
            if let Some(hooks) = &self.hooks {
                let hook_result = hooks.run(&HookContext::new(action, permissions));
                if let Some(reason) = hook_result.deny_reason {
                    result = AgentPermissionResult::deny(reason);
                }
            }
        }

        if !result.allowed {
            tracing::debug!(
                "Gate denied {}: {}",
                action.summary(),
                result.reason.as_deref().unwrap_or("")
            );
        }

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.record(action, &result) {
                tracing::warn!("Failed to write audit record: {}", e);
            }
        }

        result
    }

    /// Validate a batch of actions independently
    pub fn validate_batch(
        &self,
        actions: &[AgentAction],
        permissions: &FeaturePermissions,
    ) -> BatchValidation {
        batch::partition(actions, |action| self.evaluate(action, permissions))
    }

    /// Whether the action needs user confirmation before it runs
    pub fn requires_confirmation(&self, action: &AgentAction) -> bool {
        action_requires_confirmation(action) || self.always_confirm.contains(&action.action_type)
    }

    /// Whether a concrete element is off-limits
    pub fn is_element_blocked<E: ElementView>(&self, element: &E) -> bool {
        element::is_element_blocked_with(&self.blocklist, element)
    }
}
