//! Permission matrix for agent actions
//!
//! The authentication layer hands the gate a `FeaturePermissions` snapshot:
//! one `CrudPermissions` record per `FeatureModule`. Absent features and
//! malformed flags mean "no permission", never an error.
//!
//! ## Example
//!
//! ```rust
//! use safetybot_gate::permissions::{
//!     get_available_features, has_feature_permission, CrudAction, CrudPermissions,
//!     FeatureModule, FeaturePermissions,
//! };
//!
//! let matrix = FeaturePermissions::new()
//!     .with(FeatureModule::Dashboard, CrudPermissions::read_only());
//!
//! assert!(has_feature_permission(&matrix, FeatureModule::Dashboard, CrudAction::Read));
//! assert!(!has_feature_permission(&matrix, FeatureModule::Incidents, CrudAction::Read));
//! assert_eq!(get_available_features(&matrix), vec![FeatureModule::Dashboard]);
//! ```

mod matrix;

pub use matrix::{
    get_available_features, has_feature_permission, CrudAction, CrudPermissions, FeatureModule,
    FeaturePermissions,
};
