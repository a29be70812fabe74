//! Hook Types
//!
//! - `HookContext` - What a hook sees about the action under evaluation
//! - `HookResult` - Continue, or deny with a reason

use crate::core::AgentAction;
use crate::permissions::FeaturePermissions;

/// Read-only context passed to hooks
///
/// Hooks see the action and the permission snapshot it is being evaluated
/// against. They cannot modify either.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Action being evaluated
    pub action: &'a AgentAction,

    /// Permission snapshot for the current session
    pub permissions: &'a FeaturePermissions,
}

impl<'a> HookContext<'a> {
    /// Create a context for one evaluation
    pub fn new(action: &'a AgentAction, permissions: &'a FeaturePermissions) -> Self {
        Self {
            action,
            permissions,
        }
    }

    /// Action target, lowercased
    pub fn normalized_target(&self) -> String {
        self.action.target.trim().to_lowercase()
    }

    /// String parameter of the action, if present
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.action.params.get(key).and_then(|v| v.as_str())
    }
}

/// Result returned from a hook
///
/// Hooks can only restrict. There is no way to grant an action that the
/// built-in rules deny.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookResult {
    /// Reason for denial; `None` means continue
    pub deny_reason: Option<String>,
}

impl HookResult {
    /// Continue normally
    pub fn none() -> Self {
        Self::default()
    }

    /// Deny the action with a reason
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            deny_reason: Some(reason.into()),
        }
    }

    /// Whether this result denies the action
    pub fn is_deny(&self) -> bool {
        self.deny_reason.is_some()
    }
}
