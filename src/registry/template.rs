//! Action templates
//!
//! A template is a named, parameterised agent action. Targets may contain
//! `{name}` placeholders that are filled from parameters when the action is
//! built.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{ActionType, AgentAction, GateError, GateResult};
use crate::permissions::{CrudAction, FeatureModule};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Catalog entry describing an action the agent knows how to perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplate {
    /// Unique id, e.g. `incidents.declare`
    pub id: String,

    /// What the action does, for prompts and listings
    pub description: String,

    /// Kind of action
    #[serde(rename = "type")]
    pub action_type: ActionType,

    /// Path or selector, possibly with `{placeholders}`
    pub target: String,

    /// Feature the action touches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<FeatureModule>,

    /// Permission needed on `feature`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crud_action: Option<CrudAction>,

    /// Always ask the user before running
    #[serde(default)]
    pub requires_confirmation: bool,
}

impl ActionTemplate {
    /// Create a template with no feature binding
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        action_type: ActionType,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            action_type,
            target: target.into(),
            feature: None,
            crud_action: None,
            requires_confirmation: false,
        }
    }

    /// Bind to a feature and the CRUD permission it needs
    pub fn with_feature(mut self, feature: FeatureModule, crud_action: CrudAction) -> Self {
        self.feature = Some(feature);
        self.crud_action = Some(crud_action);
        self
    }

    /// Always ask the user before running
    pub fn confirmed(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }

    /// Placeholder names in the target, in order of first appearance
    pub fn required_params(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in placeholder_pattern().captures_iter(&self.target) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Instantiate an action
    ///
    /// Placeholders are filled from string or number parameters. All
    /// parameters are passed through to the executor.
    pub fn build(&self, params: &Map<String, Value>) -> GateResult<AgentAction> {
        let mut missing: Option<String> = None;

        let target = placeholder_pattern().replace_all(&self.target, |caps: &Captures| {
            let name = &caps[1];
            match params.get(name) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });

        if let Some(param) = missing {
            return Err(GateError::missing_param(&self.id, param));
        }

        Ok(AgentAction {
            action_type: self.action_type,
            target: target.into_owned(),
            feature: self.feature,
            crud_action: self.crud_action,
            requires_confirmation: self.requires_confirmation.then_some(true),
            params: params.clone(),
        })
    }

    /// Action with placeholders left in place, for policy previews
    pub fn preview(&self) -> AgentAction {
        AgentAction {
            action_type: self.action_type,
            target: self.target.clone(),
            feature: self.feature,
            crud_action: self.crud_action,
            requires_confirmation: self.requires_confirmation.then_some(true),
            params: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open_incident() -> ActionTemplate {
        ActionTemplate::new(
            "incidents.open",
            "Open an incident",
            ActionType::Navigate,
            "/app/incidents/{incident_id}",
        )
        .with_feature(FeatureModule::Incidents, CrudAction::Read)
    }

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_params() {
        let template = ActionTemplate::new(
            "x",
            "x",
            ActionType::Click,
            "#row-{id} .btn-{kind}, #row-{id}",
        );
        assert_eq!(template.required_params(), vec!["id", "kind"]);
        assert!(open_incident().required_params() == vec!["incident_id"]);
    }

    #[test]
    fn test_build_substitutes_placeholders() {
        let action = open_incident()
            .build(&params(json!({"incident_id": "INC-2024-031"})))
            .unwrap();

        assert_eq!(action.target, "/app/incidents/INC-2024-031");
        assert_eq!(action.feature, Some(FeatureModule::Incidents));
        assert_eq!(action.crud_action, Some(CrudAction::Read));
        assert_eq!(action.requires_confirmation, None);
        assert_eq!(action.params["incident_id"], json!("INC-2024-031"));
    }

    #[test]
    fn test_build_accepts_numbers() {
        let action = open_incident()
            .build(&params(json!({"incident_id": 42})))
            .unwrap();
        assert_eq!(action.target, "/app/incidents/42");
    }

    #[test]
    fn test_build_missing_param() {
        let err = open_incident().build(&Map::new()).unwrap_err();
        assert!(matches!(
            err,
            GateError::MissingParam { ref template, ref param }
                if template == "incidents.open" && param == "incident_id"
        ));

        let err = open_incident()
            .build(&params(json!({"incident_id": {"nested": true}})))
            .unwrap_err();
        assert!(matches!(err, GateError::MissingParam { .. }));
    }

    #[test]
    fn test_confirmed_template_flags_action() {
        let template = ActionTemplate::new(
            "incidents.delete",
            "Delete",
            ActionType::Click,
            "#incident-delete-button",
        )
        .confirmed();

        let action = template.build(&Map::new()).unwrap();
        assert_eq!(action.requires_confirmation, Some(true));
        assert_eq!(template.preview().requires_confirmation, Some(true));
    }
}
