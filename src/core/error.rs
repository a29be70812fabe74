//! Gate error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur outside of policy evaluation
///
/// Evaluation itself never fails: missing or malformed permission data is
/// treated as a denial. These errors cover configuration, templates and I/O.
#[derive(Error, Debug)]
pub enum GateError {
    /// Configuration file does not exist
    #[error("Configuration not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration was readable but not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No action template registered under this id
    #[error("Unknown action template: {0}")]
    UnknownTemplate(String),

    /// A template placeholder had no matching parameter
    #[error("Missing parameter '{param}' for template '{template}'")]
    MissingParam { template: String, param: String },

    /// A hook or keyword pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl GateError {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        GateError::Other(msg.into())
    }

    /// Create a missing-parameter error
    pub fn missing_param(template: impl Into<String>, param: impl Into<String>) -> Self {
        GateError::MissingParam {
            template: template.into(),
            param: param.into(),
        }
    }
}

/// Result type alias for gate operations
pub type GateResult<T> = Result<T, GateError>;
