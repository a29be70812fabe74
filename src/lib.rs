//! Policy gate for SafetyBot, the assistant of an HSE management platform.
//!
//! Before the assistant navigates or touches a UI element on a user's
//! behalf, the gate checks the action against static blocklists (profile,
//! settings, logout...) and the user's per-feature CRUD permissions.

pub mod core;
pub mod permissions;
pub mod gate;
pub mod registry;
pub mod hooks;
pub mod executor;

// Optional components
pub mod audit;
pub mod cli;
pub mod config;
pub mod logging;
