//! Action registry
//!
//! This module provides:
//! - `ActionTemplate` - A named, parameterised agent action
//! - `ActionRegistry` - Catalog of templates with permission-aware lookups
//! - `builtin_templates` - The HSE catalog (incidents, CAPA, training, ...)

mod builtin;
#[allow(clippy::module_inception)]
mod registry;
mod template;

pub use builtin::builtin_templates;
pub use registry::ActionRegistry;
pub use template::ActionTemplate;
