//! Claude client implementation

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::llm::auth::adc::AuthenticationManager;
use crate::llm::auth::credential::ApiKey;
use crate::llm::core::{
    error::LlmError,
    provider::CompletionClient,
    types::{CompletionRequest, CompletionResult},
};
use crate::llm::http::{build_http_client, read_json};

use super::mapper::{describe_error, from_claude_response, to_claude_request, RequestTarget};
use super::types::MessagesResponse;

const MESSAGES_PATH: &str = "/v1/messages";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

enum Backend {
    /// Public Anthropic API, keyed by `x-api-key`
    Anthropic { url: String, api_key: ApiKey },
    /// Claude on Vertex AI, keyed by an ADC bearer token
    Vertex {
        project_id: String,
        location: String,
        auth_manager: AuthenticationManager,
    },
}

/// Client for Claude models, either direct or through Vertex AI
pub struct ClaudeClient {
    http_client: Client,
    backend: Backend,
}

impl ClaudeClient {
    /// Client for the Anthropic Messages API at `base_url`
    pub fn anthropic(base_url: impl Into<String>, api_key: ApiKey) -> Result<Self, LlmError> {
        let base: String = base_url.into();
        Ok(Self {
            http_client: build_http_client()?,
            backend: Backend::Anthropic {
                url: format!("{}{}", base.trim_end_matches('/'), MESSAGES_PATH),
                api_key,
            },
        })
    }

    /// Client for Claude on Vertex AI
    ///
    /// # Arguments
    ///
    /// * `project_id` - GCP project ID
    /// * `location` - GCP location (e.g., "us-central1", or "global")
    /// * `auth_manager` - ADC token source
    pub fn vertex(
        project_id: String,
        location: String,
        auth_manager: AuthenticationManager,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            http_client: build_http_client()?,
            backend: Backend::Vertex {
                project_id,
                location,
                auth_manager,
            },
        })
    }
}

/// Build the Vertex AI `rawPredict` URL for `model`
pub fn vertex_endpoint_url(project_id: &str, location: &str, model: &str) -> String {
    let host = if location == "global" {
        "aiplatform.googleapis.com".to_string()
    } else {
        format!("{}-aiplatform.googleapis.com", location)
    };
    format!(
        "https://{}/v1/projects/{}/locations/{}/publishers/anthropic/models/{}:rawPredict",
        host, project_id, location, model
    )
}

#[async_trait]
impl CompletionClient for ClaudeClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, LlmError> {
        let response = match &self.backend {
            Backend::Anthropic { url, api_key } => {
                let body = to_claude_request(request, RequestTarget::Anthropic);
                debug!(url = %url, model = %request.config.model, "sending Anthropic request");
                self.http_client
                    .post(url)
                    .header("x-api-key", api_key.expose())
                    .header("anthropic-version", ANTHROPIC_API_VERSION)
                    .json(&body)
                    .send()
                    .await?
            }
            Backend::Vertex {
                project_id,
                location,
                auth_manager,
            } => {
                let body = to_claude_request(request, RequestTarget::Vertex);
                let url = vertex_endpoint_url(project_id, location, &request.config.model);
                let bearer = auth_manager.bearer_header().await?;
                debug!(url = %url, "sending Vertex AI Claude request");
                self.http_client
                    .post(&url)
                    .header("Authorization", bearer)
                    .json(&body)
                    .send()
                    .await?
            }
        };

        let parsed: MessagesResponse = read_json(response, "claude", describe_error).await?;
        Ok(from_claude_response(parsed))
    }
}
