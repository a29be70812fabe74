//! Hooks Module
//!
//! Add site-specific restrictions on top of the built-in gate.
//!
//! Hooks run after the built-in rules have allowed an action. They can deny
//! it with a reason, but they can never grant something the blocklists or
//! the permission matrix refuse.
//!
//! | Method | Effect |
//! |--------|--------|
//! | `HookResult::none()` | Continue normally |
//! | `HookResult::deny("reason")` | Refuse the action |

mod registry;
mod types;

pub use registry::{ArcHook, GateHook, HookMatcher, HookRegistry};
pub use types::{HookContext, HookResult};
