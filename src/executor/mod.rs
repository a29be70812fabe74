//! Execution seam
//!
//! The gate never touches the UI itself. An execution layer implements
//! `ActionExecutor`; `GuardedExecutor` wraps it so that every action is
//! re-evaluated against the caller's current permission snapshot right
//! before it runs. No approval is cached across calls or retries.

mod guarded;

pub use guarded::{ExecutionOutcome, GuardedExecutor};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::AgentAction;

/// Result of performing an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// What the executor observed
    pub output: String,
    /// Whether the interaction failed on the UI side
    pub is_error: bool,
}

impl ActionOutcome {
    /// Create a successful outcome
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error outcome
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            output: message.into(),
            is_error: true,
        }
    }
}

/// Performs approved actions (navigation, DOM interaction)
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Name of this executor, for logs
    fn name(&self) -> &str;

    /// Perform the action
    ///
    /// Only called with actions the gate has just approved.
    async fn execute(&self, action: &AgentAction) -> Result<ActionOutcome>;
}
