//! Static blocklists for sensitive paths and UI elements
//!
//! The built-in entries are always enforced. Configuration can add entries
//! but never remove one. All matching is done on lowercased input and errs
//! towards over-blocking.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::{GateConfig, KeywordMatching};
use crate::core::GateResult;

/// Path prefixes the agent may never navigate to
pub const BLOCKED_PATHS: &[&str] = &[
    "/app/profile",
    "/app/settings",
    "/app/account",
    "/profile",
    "/settings",
    "/account",
    "/logout",
    "/signout",
    "/auth/logout",
    "/auth/signout",
];

/// Selector fragments identifying account, profile and session controls
///
/// Used both as substring markers against target descriptors and as real
/// selector patterns against element snapshots.
pub const BLOCKED_SELECTORS: &[&str] = &[
    "[data-action=\"logout\"]",
    "[data-action=\"signout\"]",
    "[data-testid=\"user-menu\"]",
    "[href*=\"logout\"]",
    "[href*=\"signout\"]",
    "[href*=\"profile\"]",
    "[href*=\"settings\"]",
    "[href*=\"account\"]",
    "#logout-button",
    "#user-settings",
    ".user-menu",
    ".profile-menu",
];

/// Keywords (English and French) that mark an element as off-limits
pub const BLOCKED_KEYWORDS: &[&str] = &[
    "logout",
    "log-out",
    "log out",
    "signout",
    "sign-out",
    "sign out",
    "déconnexion",
    "deconnexion",
    "se déconnecter",
    "profile",
    "mon-profil",
    "mon profil",
    "settings",
    "paramètres",
    "parametres",
    "account",
    "mon-compte",
    "mon compte",
    "password",
    "mot de passe",
    "mot-de-passe",
];

/// Marker attribute that blocks an element and its whole subtree
pub const BLOCKED_ELEMENT_ATTRIBUTE: &str = "data-agent-blocked";

/// Compiled blocklist: built-in entries plus configured extras
#[derive(Debug, Clone)]
pub struct Blocklist {
    paths: Vec<String>,
    /// Selector patterns as written, for element matching
    selectors: Vec<String>,
    /// Lowercased selector patterns, for target descriptors
    selector_fragments: Vec<String>,
    keywords: Vec<String>,
    /// Word-boundary patterns, one per keyword (only in word-boundary mode)
    keyword_patterns: Option<Vec<Regex>>,
}

impl Blocklist {
    /// Shared built-in blocklist
    pub fn builtin() -> &'static Blocklist {
        static BUILTIN: OnceLock<Blocklist> = OnceLock::new();
        BUILTIN.get_or_init(|| Blocklist {
            paths: to_owned(BLOCKED_PATHS),
            selectors: to_owned(BLOCKED_SELECTORS),
            selector_fragments: to_owned(BLOCKED_SELECTORS),
            keywords: to_owned(BLOCKED_KEYWORDS),
            keyword_patterns: None,
        })
    }

    /// Built-in entries extended by a configuration
    pub fn from_config(config: &GateConfig) -> GateResult<Self> {
        let mut paths = to_owned(BLOCKED_PATHS);
        let mut selectors = to_owned(BLOCKED_SELECTORS);
        let mut keywords = to_owned(BLOCKED_KEYWORDS);

        extend_normalized(&mut paths, &config.extra_blocked_paths);
        let mut selector_fragments = selectors.clone();
        extend_normalized(&mut selector_fragments, &config.extra_blocked_selectors);
        for entry in &config.extra_blocked_selectors {
            let entry = entry.trim();
            if !entry.is_empty() && !selectors.iter().any(|s| s == entry) {
                selectors.push(entry.to_string());
            }
        }
        extend_normalized(&mut keywords, &config.extra_blocked_keywords);

        let keyword_patterns = match config.keyword_matching {
            KeywordMatching::Substring => None,
            KeywordMatching::WordBoundary => Some(
                keywords
                    .iter()
                    .map(|k| word_boundary_pattern(k))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };

        tracing::info!(
            "Blocklist ready: {} paths, {} selectors, {} keywords ({:?} matching)",
            paths.len(),
            selectors.len(),
            keywords.len(),
            config.keyword_matching
        );

        Ok(Self {
            paths,
            selectors,
            selector_fragments,
            keywords,
            keyword_patterns,
        })
    }

    /// Whether a navigation path equals or starts with a blocked prefix
    pub fn is_path_blocked(&self, path: &str) -> bool {
        let normalized = path.trim().to_lowercase();
        self.paths.iter().any(|p| normalized.starts_with(p.as_str()))
    }

    /// Whether a target descriptor contains a blocked selector fragment or
    /// keyword
    pub fn is_selector_blocked(&self, selector: &str) -> bool {
        let normalized = selector.to_lowercase();

        if self
            .selector_fragments
            .iter()
            .any(|s| normalized.contains(s.as_str()))
        {
            return true;
        }

        match &self.keyword_patterns {
            Some(patterns) => patterns.iter().any(|re| re.is_match(&normalized)),
            None => self.keywords.iter().any(|k| normalized.contains(k.as_str())),
        }
    }

    /// Selector patterns, for matching against element snapshots
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }
}

/// Whether a navigation path is blocked by the built-in list
pub fn is_path_blocked(path: &str) -> bool {
    Blocklist::builtin().is_path_blocked(path)
}

/// Whether a selector or element descriptor is blocked by the built-in list
pub fn is_selector_blocked(selector: &str) -> bool {
    Blocklist::builtin().is_selector_blocked(selector)
}

fn to_owned(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|e| e.to_string()).collect()
}

fn extend_normalized(target: &mut Vec<String>, extra: &[String]) {
    for entry in extra {
        let entry = entry.trim().to_lowercase();
        if !entry.is_empty() && !target.contains(&entry) {
            target.push(entry);
        }
    }
}

/// Keyword bounded by start/end of input or a non-alphanumeric character
fn word_boundary_pattern(keyword: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?:^|[^\p{{L}}\p{{N}}]){}(?:$|[^\p{{L}}\p{{N}}])",
        regex::escape(keyword)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_paths() {
        assert!(is_path_blocked("/app/settings"));
        assert!(is_path_blocked("/app/settings/notifications"));
        assert!(is_path_blocked("/logout"));
        assert!(is_path_blocked("/signout?next=/"));
        assert!(!is_path_blocked("/app/dashboard"));
        assert!(!is_path_blocked("/app/incidents/new"));
    }

    #[test]
    fn test_path_normalization() {
        assert!(is_path_blocked("  /APP/Profile  "));
        assert!(is_path_blocked("/Logout"));
        assert!(!is_path_blocked("app/settings"));
    }

    #[test]
    fn test_blocked_selectors() {
        assert!(is_selector_blocked("#user-profile-link"));
        assert!(is_selector_blocked("button.DÉCONNEXION"));
        assert!(is_selector_blocked("a[href*=\"logout\"]"));
        assert!(is_selector_blocked("Paramètres du compte"));
        assert!(is_selector_blocked("[data-testid=\"user-menu\"] > li"));
        assert!(!is_selector_blocked("#incident-save-button"));
        assert!(!is_selector_blocked("#capa-new-button"));
    }

    #[test]
    fn test_substring_matching_overblocks() {
        // "profile" inside an unrelated word is still blocked
        assert!(is_selector_blocked("#risk-profiler-chart"));
    }

    #[test]
    fn test_config_extends_builtin_lists() {
        let config = GateConfig::new()
            .with_blocked_path("/app/billing")
            .with_blocked_keyword("  Facturation ");
        let blocklist = Blocklist::from_config(&config).unwrap();

        assert!(blocklist.is_path_blocked("/app/billing/invoices"));
        assert!(blocklist.is_selector_blocked("#menu-facturation"));
        // Built-in entries still apply
        assert!(blocklist.is_path_blocked("/app/settings"));
        assert!(blocklist.is_selector_blocked("#logout-button"));
    }

    #[test]
    fn test_word_boundary_matching() {
        let config = GateConfig::new().with_keyword_matching(KeywordMatching::WordBoundary);
        let blocklist = Blocklist::from_config(&config).unwrap();

        assert!(!blocklist.is_selector_blocked("#risk-profiler-chart"));
        assert!(blocklist.is_selector_blocked("#user-profile-link"));
        assert!(blocklist.is_selector_blocked("profile"));
        assert!(blocklist.is_selector_blocked("Mon compte"));
        // Underscores delimit words too
        assert!(blocklist.is_selector_blocked("#user_profile_link"));
        assert!(blocklist.is_selector_blocked("#btn_password_reset"));
        // Selector fragments keep substring semantics
        assert!(blocklist.is_selector_blocked("a[href*=\"settings\"]"));
    }

    #[test]
    fn test_builtin_selectors_exposed() {
        assert_eq!(Blocklist::builtin().selectors().len(), BLOCKED_SELECTORS.len());
    }
}
