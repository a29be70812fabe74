//! Core types for the action gate
//!
//! This module provides the fundamental types used throughout the crate:
//! - `AgentAction` - A proposed agent operation
//! - `ActionType` - Navigation and UI interaction kinds
//! - `AgentPermissionResult` - Outcome of a single evaluation
//! - `GateError` - Error types

pub mod action;
pub mod error;

pub use action::{ActionType, AgentAction, AgentPermissionResult};
pub use error::{GateError, GateResult};
