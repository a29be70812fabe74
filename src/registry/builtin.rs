//! Built-in HSE action catalog

use crate::core::ActionType;
use crate::permissions::{CrudAction, FeatureModule};

use super::template::ActionTemplate;

use ActionType::{Click, FillInput, Navigate, SelectOption, SubmitForm};
use CrudAction::{Create, Delete, Read, Update};
use FeatureModule::{Analytics, Capa, Compliance, Dashboard, Health, Incidents, Training};

/// Templates shipped with the assistant
pub fn builtin_templates() -> Vec<ActionTemplate> {
    vec![
        // Dashboard
        ActionTemplate::new("dashboard.open", "Open the safety dashboard", Navigate, "/app/dashboard")
            .with_feature(Dashboard, Read),
        // Incidents
        ActionTemplate::new("incidents.list", "List reported incidents", Navigate, "/app/incidents")
            .with_feature(Incidents, Read),
        ActionTemplate::new(
            "incidents.open",
            "Open an incident report",
            Navigate,
            "/app/incidents/{incident_id}",
        )
        .with_feature(Incidents, Read),
        ActionTemplate::new(
            "incidents.declare",
            "Start declaring a new incident",
            Click,
            "#incident-new-button",
        )
        .with_feature(Incidents, Create),
        ActionTemplate::new(
            "incidents.describe",
            "Fill in the incident description",
            FillInput,
            "#incident-description",
        )
        .with_feature(Incidents, Create),
        ActionTemplate::new(
            "incidents.set_severity",
            "Set the severity of an incident",
            SelectOption,
            "#incident-severity-select",
        )
        .with_feature(Incidents, Update),
        ActionTemplate::new(
            "incidents.delete",
            "Delete an incident report",
            Click,
            "#incident-delete-button",
        )
        .with_feature(Incidents, Delete)
        .confirmed(),
        // CAPA
        ActionTemplate::new("capa.list", "List corrective and preventive actions", Navigate, "/app/capa")
            .with_feature(Capa, Read),
        ActionTemplate::new("capa.create", "Create a corrective action", Click, "#capa-new-button")
            .with_feature(Capa, Create),
        ActionTemplate::new(
            "capa.close",
            "Close a corrective action",
            SubmitForm,
            "#capa-{capa_id}-close-form",
        )
        .with_feature(Capa, Update),
        // Training
        ActionTemplate::new("training.catalog", "Browse the training catalog", Navigate, "/app/training")
            .with_feature(Training, Read),
        ActionTemplate::new(
            "training.assign",
            "Assign a training session to an employee",
            SubmitForm,
            "#training-assign-form",
        )
        .with_feature(Training, Create),
        // Compliance
        ActionTemplate::new(
            "compliance.audits",
            "List compliance audits",
            Navigate,
            "/app/compliance/audits",
        )
        .with_feature(Compliance, Read),
        ActionTemplate::new(
            "compliance.start_audit",
            "Start a new compliance audit",
            Click,
            "#audit-start-button",
        )
        .with_feature(Compliance, Create),
        // Occupational health
        ActionTemplate::new("health.records", "Open occupational health records", Navigate, "/app/health")
            .with_feature(Health, Read),
        // Analytics
        ActionTemplate::new("analytics.overview", "Open safety analytics", Navigate, "/app/analytics")
            .with_feature(Analytics, Read),
        ActionTemplate::new(
            "analytics.export",
            "Export the analytics report",
            Click,
            "#analytics-export-button",
        )
        .with_feature(Analytics, Read),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{is_path_blocked, is_selector_blocked};
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let templates = builtin_templates();
        let ids: HashSet<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_no_builtin_target_is_blocklisted() {
        for template in builtin_templates() {
            let blocked = if template.action_type == Navigate {
                is_path_blocked(&template.target)
            } else {
                is_selector_blocked(&template.target)
            };
            assert!(!blocked, "{} targets a blocked area", template.id);
        }
    }

    #[test]
    fn test_every_template_is_bound_to_a_feature() {
        for template in builtin_templates() {
            assert!(template.feature.is_some(), "{}", template.id);
            assert!(template.crud_action.is_some(), "{}", template.id);
        }
    }
}
