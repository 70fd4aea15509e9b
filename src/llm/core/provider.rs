//! Completion client trait and provider factory

use async_trait::async_trait;

use super::{
    config::ProviderConfig,
    error::LlmError,
    types::{CompletionRequest, CompletionResult},
};
use crate::llm::auth::adc::AuthenticationManager;
use crate::llm::claude::ClaudeClient;
use crate::llm::openai::OpenAiClient;

/// Main interface that all LLM provider implementations must satisfy
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the request and wait for the top-ranked response
    ///
    /// Implementations must not modify the request and must surface provider
    /// failures as the matching [`LlmError`] kind without retrying.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, LlmError>;
}

/// Create a completion client from explicit provider settings
///
/// Credentials referenced by `config` are resolved here, once; a missing
/// credential fails with [`LlmError::AuthenticationError`].
///
/// # Example
///
/// ```rust,no_run
/// use llm_hooks::llm::{create_client, ProviderConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = create_client(&ProviderConfig::openai()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_client(config: &ProviderConfig) -> Result<Box<dyn CompletionClient>, LlmError> {
    match config {
        ProviderConfig::OpenAi { base_url, api_key } => {
            let client = OpenAiClient::openai(base_url.clone(), api_key.resolve()?)?;
            Ok(Box::new(client))
        }
        ProviderConfig::AzureOpenAi {
            endpoint,
            deployment,
            api_version,
            api_key,
        } => {
            let client = OpenAiClient::azure(
                endpoint.clone(),
                deployment.clone(),
                api_version.clone(),
                api_key.resolve()?,
            )?;
            Ok(Box::new(client))
        }
        ProviderConfig::Anthropic { base_url, api_key } => {
            let client = ClaudeClient::anthropic(base_url.clone(), api_key.resolve()?)?;
            Ok(Box::new(client))
        }
        ProviderConfig::VertexClaude {
            project_id,
            location,
        } => {
            let auth_manager = AuthenticationManager::new().await?;
            let client = ClaudeClient::vertex(project_id.clone(), location.clone(), auth_manager)?;
            Ok(Box::new(client))
        }
    }
}
