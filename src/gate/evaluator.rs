//! Single-action permission evaluation
//!
//! Decision order (first match wins):
//! 1. `navigate` to a blocked path → denied
//! 2. interactive action on a blocked target → denied
//! 3. feature + CRUD action declared but not granted → denied
//! 4. otherwise → allowed
//!
//! The blocklists are an absolute override: no permission grants access to a
//! blocked path or element.

use crate::core::{ActionType, AgentAction, AgentPermissionResult};
use crate::permissions::{has_feature_permission, CrudAction, FeaturePermissions};

use super::blocklist::Blocklist;

/// Denial reason for navigation to a blocked path
pub const RESTRICTED_AREA_REASON: &str =
    "This area is restricted and cannot be accessed by the assistant";

/// Denial reason for interaction with a blocked element
pub const RESTRICTED_ELEMENT_REASON: &str =
    "This element is restricted and cannot be used by the assistant";

/// Evaluate one action against the built-in blocklists and a permission
/// matrix
pub fn can_agent_execute_action(
    action: &AgentAction,
    permissions: &FeaturePermissions,
) -> AgentPermissionResult {
    evaluate_with(Blocklist::builtin(), action, permissions)
}

/// Evaluate one action against a specific blocklist
pub(crate) fn evaluate_with(
    blocklist: &Blocklist,
    action: &AgentAction,
    permissions: &FeaturePermissions,
) -> AgentPermissionResult {
    if action.action_type == ActionType::Navigate {
        if blocklist.is_path_blocked(&action.target) {
            return AgentPermissionResult::deny(RESTRICTED_AREA_REASON);
        }
    } else if action.action_type.is_interactive() && blocklist.is_selector_blocked(&action.target)
    {
        return AgentPermissionResult::deny(RESTRICTED_ELEMENT_REASON);
    }

    if let (Some(feature), Some(crud)) = (action.feature, action.crud_action) {
        if !has_feature_permission(permissions, feature, crud) {
            return AgentPermissionResult::deny(format!(
                "You do not have '{}' permission on the {} module",
                crud, feature
            ));
        }
    }

    AgentPermissionResult::allow()
}

/// Whether the execution layer must ask the user before running this action
///
/// Irreversible actions (updates, deletes, form submissions that are not
/// reads) and explicitly flagged actions need confirmation.
pub fn action_requires_confirmation(action: &AgentAction) -> bool {
    if action.requires_confirmation == Some(true) {
        return true;
    }

    if matches!(
        action.crud_action,
        Some(CrudAction::Update) | Some(CrudAction::Delete)
    ) {
        return true;
    }

    action.action_type == ActionType::SubmitForm && action.crud_action != Some(CrudAction::Read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{CrudPermissions, FeatureModule};

    fn full_access() -> FeaturePermissions {
        FeatureModule::ALL
            .into_iter()
            .fold(FeaturePermissions::new(), |m, f| m.with(f, CrudPermissions::all()))
    }

    #[test]
    fn test_navigate_to_blocked_path_denied_regardless_of_permissions() {
        let action = AgentAction::navigate("/app/settings");

        for matrix in [FeaturePermissions::new(), full_access()] {
            let result = can_agent_execute_action(&action, &matrix);
            assert!(!result.allowed);
            assert_eq!(result.reason.as_deref(), Some(RESTRICTED_AREA_REASON));
        }
    }

    #[test]
    fn test_blocked_path_wins_over_granted_feature() {
        let action = AgentAction::navigate("/app/profile/edit")
            .with_feature(FeatureModule::Dashboard, CrudAction::Read);
        let result = can_agent_execute_action(&action, &full_access());
        assert_eq!(result.reason.as_deref(), Some(RESTRICTED_AREA_REASON));
    }

    #[test]
    fn test_click_on_blocked_element_denied() {
        let action = AgentAction::click("#logout-button");
        let result = can_agent_execute_action(&action, &full_access());
        assert!(!result.allowed);
        assert_eq!(result.reason.as_deref(), Some(RESTRICTED_ELEMENT_REASON));
    }

    #[test]
    fn test_non_interactive_action_skips_selector_check() {
        let action = AgentAction::new(ActionType::Highlight, "#user-profile-card");
        let result = can_agent_execute_action(&action, &FeaturePermissions::new());
        assert!(result.allowed);
    }

    #[test]
    fn test_click_with_granted_permission_allowed() {
        let matrix = FeaturePermissions::new().with(
            FeatureModule::Capa,
            CrudPermissions {
                create: true,
                ..CrudPermissions::default()
            },
        );
        let action = AgentAction::click("#capa-new-button")
            .with_feature(FeatureModule::Capa, CrudAction::Create);

        let result = can_agent_execute_action(&action, &matrix);
        assert_eq!(result, AgentPermissionResult::allow());
    }

    #[test]
    fn test_missing_permission_reason_names_feature() {
        let matrix = FeaturePermissions::new()
            .with(FeatureModule::Incidents, CrudPermissions::read_only());
        let action = AgentAction::click("#incident-delete-button")
            .with_feature(FeatureModule::Incidents, CrudAction::Delete);

        let result = can_agent_execute_action(&action, &matrix);
        assert!(!result.allowed);
        let reason = result.reason.unwrap();
        assert!(reason.contains("incidents"));
        assert!(reason.contains("delete"));
    }

    #[test]
    fn test_feature_without_crud_action_is_not_checked() {
        let mut action = AgentAction::navigate("/app/training");
        action.feature = Some(FeatureModule::Training);

        let result = can_agent_execute_action(&action, &FeaturePermissions::new());
        assert!(result.allowed);
    }

    #[test]
    fn test_confirmation_for_delete_and_update() {
        let delete = AgentAction::click("#incident-delete-button")
            .with_feature(FeatureModule::Incidents, CrudAction::Delete);
        let update = AgentAction::new(ActionType::Toggle, "#capa-done")
            .with_feature(FeatureModule::Capa, CrudAction::Update);

        assert!(action_requires_confirmation(&delete));
        assert!(action_requires_confirmation(&update));
    }

    #[test]
    fn test_no_confirmation_for_read() {
        let read = AgentAction::navigate("/app/incidents")
            .with_feature(FeatureModule::Incidents, CrudAction::Read);
        assert!(!action_requires_confirmation(&read));
    }

    #[test]
    fn test_confirmation_for_submit_form() {
        let bare = AgentAction::new(ActionType::SubmitForm, "#incident-form");
        let create = AgentAction::new(ActionType::SubmitForm, "#incident-form")
            .with_feature(FeatureModule::Incidents, CrudAction::Create);
        let search = AgentAction::new(ActionType::SubmitForm, "#incident-search")
            .with_feature(FeatureModule::Incidents, CrudAction::Read);

        assert!(action_requires_confirmation(&bare));
        assert!(action_requires_confirmation(&create));
        assert!(!action_requires_confirmation(&search));
    }

    #[test]
    fn test_explicit_confirmation_flag() {
        let flagged = AgentAction::click("#export").with_confirmation(true);
        let unflagged = AgentAction::click("#export").with_confirmation(false);

        assert!(action_requires_confirmation(&flagged));
        assert!(!action_requires_confirmation(&unflagged));
    }
}
