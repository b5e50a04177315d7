//! Builder configuration
//!
//! Lets an application pick the generated method name and token suffix from a
//! YAML or JSON document instead of code.

use serde::{Deserialize, Serialize};

use crate::errors::ModuleBuilderError;
use crate::token::DEFAULT_TOKEN_SUFFIX;

/// Method name used when none is configured
pub const DEFAULT_METHOD_NAME: &str = "register";

/// Suffix of the deferred method derived from the configured name
pub const ASYNC_METHOD_SUFFIX: &str = "_async";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Name of the synchronous register method
    pub method_name: String,
    /// Suffix appended to generated options tokens
    pub token_suffix: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            method_name: DEFAULT_METHOD_NAME.to_string(),
            token_suffix: DEFAULT_TOKEN_SUFFIX.to_string(),
        }
    }
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method_name(mut self, method_name: impl Into<String>) -> Self {
        self.method_name = method_name.into();
        self
    }

    pub fn with_token_suffix(mut self, token_suffix: impl Into<String>) -> Self {
        self.token_suffix = token_suffix.into();
        self
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(source: &str) -> Result<Self, ModuleBuilderError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(source: &str) -> Result<Self, ModuleBuilderError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce callable method names
    pub fn validate(&self) -> Result<(), ModuleBuilderError> {
        if self.method_name.trim().is_empty() {
            return Err(ModuleBuilderError::configuration(
                "method_name must not be empty",
            ));
        }

        if self.method_name.ends_with(ASYNC_METHOD_SUFFIX) {
            tracing::warn!(
                "Configured method name '{}' already ends with '{}'",
                self.method_name,
                ASYNC_METHOD_SUFFIX
            );
        }

        Ok(())
    }

    pub fn async_method_name(&self) -> String {
        format!("{}{}", self.method_name, ASYNC_METHOD_SUFFIX)
    }
}
