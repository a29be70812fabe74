//! Agent action value objects
//!
//! An `AgentAction` is produced by the planning layer, inspected by the gate,
//! and handed to an executor only after approval. The gate never mutates it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::permissions::{CrudAction, FeatureModule};

/// Kind of operation the agent wants to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Route change to an application path
    Navigate,
    /// Click on an element
    Click,
    /// Type into an input
    FillInput,
    /// Pick an option in a select element
    SelectOption,
    /// Flip a checkbox or switch
    Toggle,
    /// Submit a form
    SubmitForm,
    /// Scroll an element into view
    Scroll,
    /// Visually highlight an element for the user
    Highlight,
    /// Wait for an element to appear
    Wait,
}

impl ActionType {
    /// Every action type, in declaration order
    pub const ALL: [ActionType; 9] = [
        ActionType::Navigate,
        ActionType::Click,
        ActionType::FillInput,
        ActionType::SelectOption,
        ActionType::Toggle,
        ActionType::SubmitForm,
        ActionType::Scroll,
        ActionType::Highlight,
        ActionType::Wait,
    ];

    /// Wire name of this action type
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Navigate => "navigate",
            ActionType::Click => "click",
            ActionType::FillInput => "fill_input",
            ActionType::SelectOption => "select_option",
            ActionType::Toggle => "toggle",
            ActionType::SubmitForm => "submit_form",
            ActionType::Scroll => "scroll",
            ActionType::Highlight => "highlight",
            ActionType::Wait => "wait",
        }
    }

    /// Whether this action mutates or activates a UI element
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            ActionType::Click
                | ActionType::FillInput
                | ActionType::SelectOption
                | ActionType::Toggle
                | ActionType::SubmitForm
        )
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single proposed agent operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    /// What to do
    #[serde(rename = "type")]
    pub action_type: ActionType,

    /// Navigation path or element selector
    pub target: String,

    /// Feature module the action touches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<FeatureModule>,

    /// CRUD permission the action needs on `feature`
    #[serde(
        default,
        alias = "crudAction",
        skip_serializing_if = "Option::is_none"
    )]
    pub crud_action: Option<CrudAction>,

    /// Explicit request for user confirmation
    #[serde(
        default,
        alias = "requiresConfirmation",
        skip_serializing_if = "Option::is_none"
    )]
    pub requires_confirmation: Option<bool>,

    /// Opaque parameters for the executor (values to type, option to pick...)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl AgentAction {
    /// Create an action with no feature binding
    pub fn new(action_type: ActionType, target: impl Into<String>) -> Self {
        Self {
            action_type,
            target: target.into(),
            feature: None,
            crud_action: None,
            requires_confirmation: None,
            params: Map::new(),
        }
    }

    /// Create a navigation action
    pub fn navigate(path: impl Into<String>) -> Self {
        Self::new(ActionType::Navigate, path)
    }

    /// Create a click action
    pub fn click(selector: impl Into<String>) -> Self {
        Self::new(ActionType::Click, selector)
    }

    /// Create a fill-input action with the value to type
    pub fn fill_input(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ActionType::FillInput, selector).with_param("value", value.into())
    }

    /// Bind the action to a feature and the CRUD permission it needs
    pub fn with_feature(mut self, feature: FeatureModule, crud_action: CrudAction) -> Self {
        self.feature = Some(feature);
        self.crud_action = Some(crud_action);
        self
    }

    /// Set the explicit confirmation flag
    pub fn with_confirmation(mut self, requires_confirmation: bool) -> Self {
        self.requires_confirmation = Some(requires_confirmation);
        self
    }

    /// Add an executor parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Short human-readable form, used in logs and the CLI
    pub fn summary(&self) -> String {
        match (self.feature, self.crud_action) {
            (Some(feature), Some(crud)) => {
                format!("{} {} [{}:{}]", self.action_type, self.target, feature, crud)
            }
            _ => format!("{} {}", self.action_type, self.target),
        }
    }
}

/// Outcome of evaluating one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPermissionResult {
    /// Whether the action may run
    pub allowed: bool,

    /// Why it was denied (absent when allowed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AgentPermissionResult {
    /// Allow with no reason
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// Deny with a reason
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}
