//! Gate-enforcing executor wrapper

use std::sync::Arc;

use anyhow::Result;

use super::{ActionExecutor, ActionOutcome};
use crate::core::AgentAction;
use crate::gate::ActionGate;
use crate::permissions::FeaturePermissions;

/// What happened to an action submitted for execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The gate allowed it and the executor ran it
    Executed(ActionOutcome),
    /// The gate refused it
    Denied { reason: String },
    /// Allowed, but the user has to confirm first
    NeedsConfirmation,
}

impl ExecutionOutcome {
    /// Whether the executor actually ran
    pub fn was_executed(&self) -> bool {
        matches!(self, ExecutionOutcome::Executed(_))
    }
}

/// Executor wrapper that evaluates every action right before running it
pub struct GuardedExecutor<E> {
    gate: Arc<ActionGate>,
    executor: E,
}

impl<E: ActionExecutor> GuardedExecutor<E> {
    /// Wrap an executor with a gate
    pub fn new(gate: Arc<ActionGate>, executor: E) -> Self {
        Self { gate, executor }
    }

    /// The gate in use
    pub fn gate(&self) -> &ActionGate {
        &self.gate
    }

    /// The wrapped executor
    pub fn inner(&self) -> &E {
        &self.executor
    }

    /// Evaluate and, if allowed, run one action
    ///
    /// `confirmed` states whether the user has already approved this
    /// specific action.
    pub async fn execute(
        &self,
        action: &AgentAction,
        permissions: &FeaturePermissions,
        confirmed: bool,
    ) -> Result<ExecutionOutcome> {
        let decision = self.gate.evaluate(action, permissions);
        if !decision.allowed {
            let reason = decision
                .reason
                .unwrap_or_else(|| "Action denied".to_string());
            tracing::info!("[{}] Refused {}: {}", self.executor.name(), action.summary(), reason);
            return Ok(ExecutionOutcome::Denied { reason });
        }

        if !confirmed && self.gate.requires_confirmation(action) {
            tracing::debug!("[{}] Awaiting confirmation for {}", self.executor.name(), action.summary());
            return Ok(ExecutionOutcome::NeedsConfirmation);
        }

        tracing::info!("[{}] Executing {}", self.executor.name(), action.summary());
        let outcome = self.executor.execute(action).await?;
        tracing::debug!(
            "[{}] Completed {}. Is error: {}",
            self.executor.name(),
            action.summary(),
            outcome.is_error
        );

        Ok(ExecutionOutcome::Executed(outcome))
    }

    /// Run actions in order, evaluating each just before it runs
    ///
    /// Denied and unconfirmed actions are reported and skipped. An executor
    /// error stops the batch.
    pub async fn execute_batch(
        &self,
        actions: &[AgentAction],
        permissions: &FeaturePermissions,
        confirmed: bool,
    ) -> Result<Vec<ExecutionOutcome>> {
        let mut outcomes = Vec::with_capacity(actions.len());
        for action in actions {
            outcomes.push(self.execute(action, permissions, confirmed).await?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActionType;
    use crate::gate::RESTRICTED_ELEMENT_REASON;
    use crate::permissions::{CrudAction, CrudPermissions, FeatureModule};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records what it was asked to do
    #[derive(Default)]
    struct RecordingExecutor {
        performed: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl ActionExecutor for RecordingExecutor {
        fn name(&self) -> &str {
            "recording"
        }

        async fn execute(&self, action: &AgentAction) -> Result<ActionOutcome> {
            if self.fail_on.as_deref() == Some(action.target.as_str()) {
                anyhow::bail!("element detached: {}", action.target);
            }
            self.performed.lock().unwrap().push(action.target.clone());
            Ok(ActionOutcome::success(format!("done {}", action.target)))
        }
    }

    fn guarded() -> GuardedExecutor<RecordingExecutor> {
        GuardedExecutor::new(Arc::new(ActionGate::new()), RecordingExecutor::default())
    }

    #[tokio::test]
    async fn test_denied_action_never_reaches_executor() {
        let executor = guarded();
        let outcome = executor
            .execute(&AgentAction::click("#logout-button"), &FeaturePermissions::new(), true)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ExecutionOutcome::Denied {
                reason: RESTRICTED_ELEMENT_REASON.to_string()
            }
        );
        assert!(executor.inner().performed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirmation_required_for_delete() {
        let executor = guarded();
        let matrix = FeaturePermissions::new().with(FeatureModule::Incidents, CrudPermissions::all());
        let delete = AgentAction::click("#incident-delete-button")
            .with_feature(FeatureModule::Incidents, CrudAction::Delete);

        let first = executor.execute(&delete, &matrix, false).await.unwrap();
        assert_eq!(first, ExecutionOutcome::NeedsConfirmation);

        let second = executor.execute(&delete, &matrix, true).await.unwrap();
        assert!(second.was_executed());
        assert_eq!(
            *executor.inner().performed.lock().unwrap(),
            vec!["#incident-delete-button".to_string()]
        );
    }

    #[tokio::test]
    async fn test_revoked_permission_is_enforced_on_retry() {
        let executor = guarded();
        let action = AgentAction::click("#capa-new-button")
            .with_feature(FeatureModule::Capa, CrudAction::Create);

        let granted = FeaturePermissions::new().with(FeatureModule::Capa, CrudPermissions::all());
        assert!(executor.execute(&action, &granted, false).await.unwrap().was_executed());

        let revoked = FeaturePermissions::new().with(FeatureModule::Capa, CrudPermissions::read_only());
        let retry = executor.execute(&action, &revoked, false).await.unwrap();
        assert!(matches!(retry, ExecutionOutcome::Denied { .. }));
        assert_eq!(executor.inner().performed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_skips_denied_and_stops_on_error() {
        let executor = GuardedExecutor::new(
            Arc::new(ActionGate::new()),
            RecordingExecutor {
                fail_on: Some("#broken".to_string()),
                ..Default::default()
            },
        );
        let matrix = FeaturePermissions::new();

        let outcomes = executor
            .execute_batch(
                &[
                    AgentAction::navigate("/app/dashboard"),
                    AgentAction::navigate("/app/profile"),
                    AgentAction::new(ActionType::Scroll, "#chart"),
                ],
                &matrix,
                false,
            )
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].was_executed());
        assert!(matches!(outcomes[1], ExecutionOutcome::Denied { .. }));
        assert!(outcomes[2].was_executed());

        let result = executor
            .execute_batch(
                &[AgentAction::click("#broken"), AgentAction::click("#after")],
                &matrix,
                false,
            )
            .await;
        assert!(result.is_err());
        assert!(!executor
            .inner()
            .performed
            .lock()
            .unwrap()
            .contains(&"#after".to_string()));
    }
}
