//! Role-based CRUD permission matrix
//!
//! The matrix is supplied by the authentication/session layer, one snapshot
//! per request. Anything missing or malformed in it reads as "no permission".

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Functional area of the HSE application that permissions are scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureModule {
    Dashboard,
    Incidents,
    Capa,
    Training,
    Compliance,
    Health,
    Analytics,
}

impl FeatureModule {
    /// The fixed feature enumeration, in discovery order
    pub const ALL: [FeatureModule; 7] = [
        FeatureModule::Dashboard,
        FeatureModule::Incidents,
        FeatureModule::Capa,
        FeatureModule::Training,
        FeatureModule::Compliance,
        FeatureModule::Health,
        FeatureModule::Analytics,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureModule::Dashboard => "dashboard",
            FeatureModule::Incidents => "incidents",
            FeatureModule::Capa => "capa",
            FeatureModule::Training => "training",
            FeatureModule::Compliance => "compliance",
            FeatureModule::Health => "health",
            FeatureModule::Analytics => "analytics",
        }
    }

    /// Look up a feature by its wire identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == id)
    }
}

impl fmt::Display for FeatureModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four independently grantable permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudAction {
    Create,
    Read,
    Update,
    Delete,
}

impl CrudAction {
    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            CrudAction::Create => "create",
            CrudAction::Read => "read",
            CrudAction::Update => "update",
            CrudAction::Delete => "delete",
        }
    }
}

impl fmt::Display for CrudAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD flags for a single feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudPermissions {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl CrudPermissions {
    /// Every permission granted
    pub fn all() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
        }
    }

    /// Read access only
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Self::default()
        }
    }

    /// Flag for a given CRUD action
    pub fn allows(&self, action: CrudAction) -> bool {
        match action {
            CrudAction::Create => self.create,
            CrudAction::Read => self.read,
            CrudAction::Update => self.update,
            CrudAction::Delete => self.delete,
        }
    }

    /// Lenient parse of a single entry: non-objects and non-boolean flags
    /// read as `false`.
    fn from_value(value: &Value) -> Self {
        let flag = |name: &str| value.get(name).and_then(Value::as_bool).unwrap_or(false);
        Self {
            create: flag("create"),
            read: flag("read"),
            update: flag("update"),
            delete: flag("delete"),
        }
    }
}

/// Per-feature CRUD matrix for one authenticated session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturePermissions {
    entries: BTreeMap<FeatureModule, CrudPermissions>,
}

impl FeaturePermissions {
    /// Empty matrix: nothing is permitted
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the permissions for a feature (builder style)
    pub fn with(mut self, feature: FeatureModule, permissions: CrudPermissions) -> Self {
        self.entries.insert(feature, permissions);
        self
    }

    /// Set the permissions for a feature
    pub fn set(&mut self, feature: FeatureModule, permissions: CrudPermissions) {
        self.entries.insert(feature, permissions);
    }

    /// Permissions for a feature, if the matrix has an entry for it
    pub fn get(&self, feature: FeatureModule) -> Option<&CrudPermissions> {
        self.entries.get(&feature)
    }

    /// Number of features with an entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the matrix has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a matrix from an untyped JSON value, failing closed on any
    /// shape mismatch.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            tracing::warn!("Permission matrix is not an object; treating as empty");
            return Self::new();
        };

        let mut entries = BTreeMap::new();
        for (key, entry) in object {
            match FeatureModule::from_id(key) {
                Some(feature) => {
                    entries.insert(feature, CrudPermissions::from_value(entry));
                }
                None => {
                    tracing::warn!("Ignoring unknown feature in permission matrix: {}", key);
                }
            }
        }

        Self { entries }
    }
}

impl Serialize for FeaturePermissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FeaturePermissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Whether the matrix grants `action` on `feature`
///
/// A feature absent from the matrix has no permissions.
pub fn has_feature_permission(
    permissions: &FeaturePermissions,
    feature: FeatureModule,
    action: CrudAction,
) -> bool {
    permissions
        .get(feature)
        .map(|p| p.allows(action))
        .unwrap_or(false)
}

/// Features the user can read, in enumeration order
///
/// Advisory only: used to scope what the assistant may talk about, not to
/// authorize anything.
pub fn get_available_features(permissions: &FeaturePermissions) -> Vec<FeatureModule> {
    FeatureModule::ALL
        .into_iter()
        .filter(|f| has_feature_permission(permissions, *f, CrudAction::Read))
        .collect()
}
