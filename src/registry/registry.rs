//! Action registry for looking up known agent actions
//!
//! The registry holds every action template the assistant may propose. It
//! answers "what can this user have the assistant do" and turns a template
//! id plus parameters into a concrete `AgentAction`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::builtin::builtin_templates;
use super::template::ActionTemplate;
use crate::core::{AgentAction, GateError, GateResult};
use crate::gate::can_agent_execute_action;
use crate::permissions::{FeatureModule, FeaturePermissions};

/// Registry of action templates, ordered by id
pub struct ActionRegistry {
    templates: BTreeMap<String, Arc<ActionTemplate>>,
}

impl ActionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// Create a registry pre-loaded with the HSE catalog
    pub fn with_builtin_templates() -> Self {
        let mut registry = Self::new();
        for template in builtin_templates() {
            registry.register(template);
        }
        registry
    }

    /// Register a template, replacing any template with the same id
    pub fn register(&mut self, template: ActionTemplate) {
        let id = template.id.clone();
        tracing::debug!("Registering action template: {}", id);
        if self.templates.insert(id.clone(), Arc::new(template)).is_some() {
            tracing::info!("[ActionRegistry] Replaced action template '{}'", id);
        }
    }

    /// Get a template by id
    pub fn get(&self, id: &str) -> Option<Arc<ActionTemplate>> {
        self.templates.get(id).cloned()
    }

    /// Template ids, in order
    pub fn ids(&self) -> Vec<&str> {
        self.templates.keys().map(|s| s.as_str()).collect()
    }

    /// All templates, in id order
    pub fn templates(&self) -> impl Iterator<Item = &Arc<ActionTemplate>> {
        self.templates.values()
    }

    /// Templates bound to a feature, in id order
    pub fn templates_for_feature(&self, feature: FeatureModule) -> Vec<Arc<ActionTemplate>> {
        self.templates
            .values()
            .filter(|t| t.feature == Some(feature))
            .cloned()
            .collect()
    }

    /// Templates the gate would allow for this permission matrix
    pub fn available_templates(&self, permissions: &FeaturePermissions) -> Vec<Arc<ActionTemplate>> {
        self.templates
            .values()
            .filter(|t| can_agent_execute_action(&t.preview(), permissions).allowed)
            .cloned()
            .collect()
    }

    /// Build a concrete action from a template
    pub fn build_action(&self, id: &str, params: &Map<String, Value>) -> GateResult<AgentAction> {
        let template = self
            .templates
            .get(id)
            .ok_or_else(|| GateError::UnknownTemplate(id.to_string()))?;
        template.build(params)
    }

    /// Get the number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
