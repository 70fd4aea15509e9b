//! Application Default Credentials (ADC) for Vertex AI

use gcp_auth::AuthenticationManager as GcpAuthManager;
use tracing::debug;

use crate::llm::core::error::LlmError;

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Supplies OAuth bearer tokens for Vertex-hosted Claude
///
/// Credential discovery follows the usual ADC order:
/// `GOOGLE_APPLICATION_CREDENTIALS`, then `gcloud auth application-default login`,
/// then the metadata server. Tokens are cached and refreshed by `gcp_auth`.
pub struct AuthenticationManager {
    inner: GcpAuthManager,
}

impl AuthenticationManager {
    /// Discover credentials
    ///
    /// # Errors
    /// Returns [`LlmError::AuthenticationError`] if no credential source is usable.
    pub async fn new() -> Result<Self, LlmError> {
        let inner = GcpAuthManager::new().await.map_err(|e| {
            LlmError::AuthenticationError(format!("no Application Default Credentials: {}", e))
        })?;
        debug!("Application Default Credentials discovered");

        Ok(Self { inner })
    }

    /// `Authorization` header value for the cloud-platform scope
    pub async fn bearer_header(&self) -> Result<String, LlmError> {
        let token = self
            .inner
            .get_token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| LlmError::AuthenticationError(format!("token refresh failed: {}", e)))?;

        Ok(format!("Bearer {}", token.as_str()))
    }
}
