//! Error types for configuration loading and simulation setup.

use thiserror::Error;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field} - {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"vehicle.capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by the simulation core.
///
/// The only failure category is an invalid configuration, detected before the
/// first step runs. Not reaching full charge within the horizon is a normal
/// outcome and is reported through the result set instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {}", join_messages(.0))]
    InvalidConfiguration(Vec<ConfigError>),
}

impl SimError {
    /// Field-level problems carried by this error.
    pub fn problems(&self) -> &[ConfigError] {
        match self {
            Self::InvalidConfiguration(errors) => errors,
        }
    }
}

fn join_messages(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
