//! Gate configuration
//!
//! Configuration can only tighten the gate: extra blocklist entries, extra
//! action types that always need confirmation, and audit output. The
//! built-in blocklists cannot be relaxed from here.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{ActionType, GateError, GateResult};

/// Environment variable pointing at a JSON configuration file
pub const CONFIG_ENV_VAR: &str = "SAFETYBOT_GATE_CONFIG";

/// How blocked keywords are matched against target descriptors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatching {
    /// Raw substring containment (over-blocks, the default)
    #[default]
    Substring,
    /// Keyword must be delimited by non-alphanumeric characters
    WordBoundary,
}

/// Configuration for an `ActionGate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Additional blocked navigation prefixes
    pub extra_blocked_paths: Vec<String>,

    /// Additional blocked selector fragments
    pub extra_blocked_selectors: Vec<String>,

    /// Additional blocked keywords
    pub extra_blocked_keywords: Vec<String>,

    /// Keyword matching mode
    pub keyword_matching: KeywordMatching,

    /// Action types that always require user confirmation
    pub always_confirm: Vec<ActionType>,

    /// Stop running hooks at the first deny
    pub short_circuit_on_deny: bool,

    /// Directory for the decision audit log (disabled when unset)
    pub audit_dir: Option<PathBuf>,
}

impl GateConfig {
    /// Create a configuration with no extensions
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> GateResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GateError::ConfigNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: GateConfig = serde_json::from_reader(reader)?;
        config.validate()?;

        tracing::info!("Loaded gate configuration from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `SAFETYBOT_GATE_CONFIG`, or defaults when
    /// the variable is unset
    pub fn from_env() -> GateResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Reject entries that would make the gate meaningless
    pub fn validate(&self) -> GateResult<()> {
        let lists = [
            ("extra_blocked_paths", &self.extra_blocked_paths),
            ("extra_blocked_selectors", &self.extra_blocked_selectors),
            ("extra_blocked_keywords", &self.extra_blocked_keywords),
        ];

        for (name, entries) in lists {
            if entries.iter().any(|e| e.trim().is_empty()) {
                return Err(GateError::InvalidConfig(format!(
                    "{} contains an empty entry",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Add a blocked navigation prefix
    pub fn with_blocked_path(mut self, path: impl Into<String>) -> Self {
        self.extra_blocked_paths.push(path.into());
        self
    }

    /// Add a blocked selector fragment
    pub fn with_blocked_selector(mut self, selector: impl Into<String>) -> Self {
        self.extra_blocked_selectors.push(selector.into());
        self
    }

    /// Add a blocked keyword
    pub fn with_blocked_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.extra_blocked_keywords.push(keyword.into());
        self
    }

    /// Set the keyword matching mode
    pub fn with_keyword_matching(mut self, matching: KeywordMatching) -> Self {
        self.keyword_matching = matching;
        self
    }

    /// Require confirmation for every action of this type
    pub fn with_always_confirm(mut self, action_type: ActionType) -> Self {
        if !self.always_confirm.contains(&action_type) {
            self.always_confirm.push(action_type);
        }
        self
    }

    /// Stop running hooks at the first deny
    pub fn with_short_circuit_on_deny(mut self, short_circuit: bool) -> Self {
        self.short_circuit_on_deny = short_circuit;
        self
    }

    /// Enable the audit log in this directory
    pub fn with_audit_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.audit_dir = Some(dir.into());
        self
    }
}
