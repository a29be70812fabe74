//! Hook Registry
//!
//! Contains:
//! - `GateHook` trait - for implementing hooks
//! - `HookMatcher` - matches actions by type-name pattern
//! - `HookRegistry` - stores and runs hooks

use std::sync::Arc;

use regex::Regex;

use super::types::{HookContext, HookResult};

/// Trait for hook implementations
///
/// Hooks are synchronous and must be free of side effects on the action;
/// evaluation stays a pure function of its inputs.
pub trait GateHook: Send + Sync {
    /// Execute the hook with the given context
    fn call(&self, ctx: &HookContext<'_>) -> HookResult;
}

/// Implement GateHook for closures
impl<F> GateHook for F
where
    F: for<'a> Fn(&HookContext<'a>) -> HookResult + Send + Sync,
{
    fn call(&self, ctx: &HookContext<'_>) -> HookResult {
        (self)(ctx)
    }
}

/// Type alias for stored hooks
pub type ArcHook = Arc<dyn GateHook>;

/// Matches actions by type name and executes a hook
pub struct HookMatcher {
    /// Regex over the action type name (None = match all)
    pattern: Option<Regex>,

    /// The hook to execute
    hook: ArcHook,
}

impl HookMatcher {
    /// Create a matcher that matches every action
    pub fn new<H: GateHook + 'static>(hook: H) -> Self {
        Self {
            pattern: None,
            hook: Arc::new(hook),
        }
    }

    /// Create a matcher with a regex pattern
    ///
    /// Pattern examples:
    /// - `"^navigate$"` - navigation only
    /// - `"fill_input|select_option"` - form inputs
    pub fn with_pattern<H: GateHook + 'static>(pattern: &str, hook: H) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Some(Regex::new(pattern)?),
            hook: Arc::new(hook),
        })
    }

    /// Check if this matcher applies to an action type
    pub fn matches(&self, action_type: &str) -> bool {
        match &self.pattern {
            Some(regex) => regex.is_match(action_type),
            None => true,
        }
    }

    /// Run the hook with the given context
    pub fn run(&self, ctx: &HookContext<'_>) -> HookResult {
        self.hook.call(ctx)
    }
}

impl std::fmt::Debug for HookMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookMatcher")
            .field("pattern", &self.pattern.as_ref().map(|r| r.as_str()))
            .finish()
    }
}

/// Ordered collection of gate hooks
///
/// # Example
///
/// ```
/// use safetybot_gate::hooks::{HookContext, HookRegistry, HookResult};
///
/// let mut hooks = HookRegistry::new();
///
/// // No typing into password-like fields
/// hooks
///     .add_with_pattern("fill_input", |ctx: &HookContext| {
///         if ctx.normalized_target().contains("pwd") {
///             HookResult::deny("Credential fields are off-limits")
///         } else {
///             HookResult::none()
///         }
///     })
///     .unwrap();
///
/// assert_eq!(hooks.len(), 1);
/// ```
#[derive(Default)]
pub struct HookRegistry {
    matchers: Vec<HookMatcher>,
    short_circuit_on_deny: bool,
}

impl HookRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook that matches all actions
    pub fn add<H: GateHook + 'static>(&mut self, hook: H) -> &mut Self {
        self.matchers.push(HookMatcher::new(hook));
        self
    }

    /// Add a hook with an action-type pattern
    pub fn add_with_pattern<H: GateHook + 'static>(
        &mut self,
        pattern: &str,
        hook: H,
    ) -> Result<&mut Self, regex::Error> {
        self.matchers.push(HookMatcher::with_pattern(pattern, hook)?);
        Ok(self)
    }

    /// Add a pre-built matcher
    pub fn add_matcher(&mut self, matcher: HookMatcher) -> &mut Self {
        self.matchers.push(matcher);
        self
    }

    /// Stop at the first deny instead of running every hook
    pub fn set_short_circuit_on_deny(&mut self, short_circuit: bool) {
        self.short_circuit_on_deny = short_circuit;
    }

    /// Number of registered hooks
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Whether no hooks are registered
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Run all matching hooks
    ///
    /// Every matching hook runs unless short-circuiting is enabled, so
    /// auditing hooks always fire. The first deny's reason is kept.
    pub fn run(&self, ctx: &HookContext<'_>) -> HookResult {
        let action_type = ctx.action.action_type.as_str();
        let mut combined = HookResult::none();

        for matcher in &self.matchers {
            if !matcher.matches(action_type) {
                continue;
            }

            combined = combine_results(combined, matcher.run(ctx));

            if self.short_circuit_on_deny && combined.is_deny() {
                tracing::debug!("[HookRegistry] Short-circuiting on deny (remaining hooks skipped)");
                break;
            }
        }

        combined
    }
}

/// Combine two hook results: a deny always wins, the earlier one first
fn combine_results(a: HookResult, b: HookResult) -> HookResult {
    if a.is_deny() {
        a
    } else {
        b
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("matchers", &self.matchers)
            .field("short_circuit_on_deny", &self.short_circuit_on_deny)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AgentAction;
    use crate::permissions::FeaturePermissions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_hook_matcher_pattern() {
        let matcher =
            HookMatcher::with_pattern("fill_input|select_option", |_ctx: &HookContext| {
                HookResult::none()
            })
            .unwrap();

        assert!(matcher.matches("fill_input"));
        assert!(matcher.matches("select_option"));
        assert!(!matcher.matches("navigate"));
    }

    #[test]
    fn test_hook_matcher_no_pattern() {
        let matcher = HookMatcher::new(|_ctx: &HookContext| HookResult::none());

        assert!(matcher.matches("navigate"));
        assert!(matcher.matches("anything"));
    }

    #[test]
    fn test_invalid_pattern() {
        let mut registry = HookRegistry::new();
        assert!(registry
            .add_with_pattern("(unclosed", |_ctx: &HookContext| HookResult::none())
            .is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_combine_first_deny_wins() {
        let result = combine_results(HookResult::deny("first"), HookResult::deny("second"));
        assert_eq!(result.deny_reason.as_deref(), Some("first"));

        let result = combine_results(HookResult::none(), HookResult::deny("second"));
        assert_eq!(result.deny_reason.as_deref(), Some("second"));

        assert!(!combine_results(HookResult::none(), HookResult::none()).is_deny());
    }

    #[test]
    fn test_run_only_matching_hooks() {
        let mut registry = HookRegistry::new();
        registry
            .add_with_pattern("^navigate$", |_ctx: &HookContext| HookResult::deny("no routing"))
            .unwrap();

        let permissions = FeaturePermissions::new();
        let click = AgentAction::click("#capa-new-button");
        let nav = AgentAction::navigate("/app/capa");

        assert!(!registry.run(&HookContext::new(&click, &permissions)).is_deny());
        assert!(registry.run(&HookContext::new(&nav, &permissions)).is_deny());
    }

    #[test]
    fn test_all_hooks_run_without_short_circuit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut registry = HookRegistry::new();
        registry.add(|_ctx: &HookContext| HookResult::deny("blocked"));
        registry.add(move |_ctx: &HookContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            HookResult::none()
        });

        let permissions = FeaturePermissions::new();
        let action = AgentAction::click("#x");
        let result = registry.run(&HookContext::new(&action, &permissions));

        assert_eq!(result.deny_reason.as_deref(), Some("blocked"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_short_circuit_skips_remaining_hooks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut registry = HookRegistry::new();
        registry.set_short_circuit_on_deny(true);
        registry.add(|_ctx: &HookContext| HookResult::deny("blocked"));
        registry.add(move |_ctx: &HookContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            HookResult::none()
        });

        let permissions = FeaturePermissions::new();
        let action = AgentAction::click("#x");
        assert!(registry.run(&HookContext::new(&action, &permissions)).is_deny());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
