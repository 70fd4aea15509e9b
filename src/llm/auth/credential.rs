//! Environment-backed credential references

use std::env;
use std::fmt;

use crate::llm::core::error::LlmError;

/// Indirect pointer to a secret: the name of the environment variable holding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRef {
    name: String,
}

impl CredentialRef {
    /// Reference the environment variable `name`
    pub fn env(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name of the referenced variable
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the secret from the process environment
    ///
    /// # Errors
    /// Returns [`LlmError::AuthenticationError`] if the variable is unset or blank.
    pub fn resolve(&self) -> Result<ApiKey, LlmError> {
        match env::var(&self.name) {
            Ok(value) if !value.trim().is_empty() => Ok(ApiKey(value)),
            _ => Err(LlmError::AuthenticationError(format!(
                "environment variable {} is not set",
                self.name
            ))),
        }
    }
}

/// A resolved secret. `Debug` and `Display` never print the value.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for request headers only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
