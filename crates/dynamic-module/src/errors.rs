//! Errors raised by the configurable module builder

use thiserror::Error;

/// Errors raised by the configurable module builder
///
/// Building and registering never fail. These errors come from dispatching a
/// method by its configured name and from loading builder configuration.
#[derive(Debug, Error)]
pub enum ModuleBuilderError {
    #[error("Unknown configurable module method '{name}' (available: {available})")]
    UnknownMethod { name: String, available: String },

    #[error("Method '{method}' expects {expected} arguments")]
    ArgumentMismatch {
        method: String,
        expected: &'static str,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModuleBuilderError {
    /// Create an unknown method error listing the names that do exist
    pub fn unknown_method(name: impl Into<String>, available: &[&str]) -> Self {
        Self::UnknownMethod {
            name: name.into(),
            available: available.join(", "),
        }
    }

    pub fn argument_mismatch(method: impl Into<String>, expected: &'static str) -> Self {
        Self::ArgumentMismatch {
            method: method.into(),
            expected,
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
