//! Credential handling
//!
//! API keys are referenced by environment variable name and resolved when a
//! client is constructed. Vertex AI uses Application Default Credentials.

pub mod adc;
pub mod credential;

pub use credential::{ApiKey, CredentialRef};
