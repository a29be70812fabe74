//! Batch validation of planned actions

use serde::{Deserialize, Serialize};

use crate::core::{AgentAction, AgentPermissionResult};
use crate::permissions::FeaturePermissions;

use super::evaluator::can_agent_execute_action;

/// A denied action and the reason it was refused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeniedAction {
    pub action: AgentAction,
    pub reason: String,
}

/// Partition of a batch into allowed and denied actions
///
/// Input order is preserved inside each bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchValidation {
    pub valid: Vec<AgentAction>,
    pub invalid: Vec<DeniedAction>,
}

impl BatchValidation {
    /// Total number of actions validated
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    /// Whether the batch was empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every action was allowed
    pub fn all_allowed(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Validate every action independently against the built-in rules
pub fn validate_action_batch(
    actions: &[AgentAction],
    permissions: &FeaturePermissions,
) -> BatchValidation {
    partition(actions, |action| can_agent_execute_action(action, permissions))
}

/// Split actions by an evaluation function
pub(crate) fn partition<F>(actions: &[AgentAction], mut evaluate: F) -> BatchValidation
where
    F: FnMut(&AgentAction) -> AgentPermissionResult,
{
    let mut batch = BatchValidation::default();

    for action in actions {
        let result = evaluate(action);
        if result.allowed {
            batch.valid.push(action.clone());
        } else {
            let reason = result
                .reason
                .unwrap_or_else(|| "Action denied".to_string());
            tracing::debug!("Denied {}: {}", action.summary(), reason);
            batch.invalid.push(DeniedAction {
                action: action.clone(),
                reason,
            });
        }
    }

    batch
}
