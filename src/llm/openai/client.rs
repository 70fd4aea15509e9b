//! OpenAI / Azure OpenAI client implementation

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::llm::auth::credential::ApiKey;
use crate::llm::core::{
    error::LlmError,
    provider::CompletionClient,
    types::{CompletionRequest, CompletionResult},
};
use crate::llm::http::{build_http_client, read_json};

use super::mapper::{describe_error, from_chat_response, to_chat_request};
use super::types::ChatCompletionResponse;

/// How the key is presented to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyHeader {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `api-key: <key>` (Azure)
    AzureApiKey,
}

/// Client for the Chat Completions API
pub struct OpenAiClient {
    http_client: Client,
    url: String,
    api_key: ApiKey,
    key_header: KeyHeader,
}

impl OpenAiClient {
    /// Client for OpenAI or a compatible server rooted at `base_url` (e.g. `https://api.openai.com/v1`)
    pub fn openai(base_url: impl Into<String>, api_key: ApiKey) -> Result<Self, LlmError> {
        let base: String = base_url.into();
        Ok(Self {
            http_client: build_http_client()?,
            url: format!("{}/chat/completions", base.trim_end_matches('/')),
            api_key,
            key_header: KeyHeader::Bearer,
        })
    }

    /// Client for an Azure OpenAI deployment
    pub fn azure(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
        api_key: ApiKey,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            http_client: build_http_client()?,
            url: azure_endpoint_url(&endpoint.into(), &deployment.into(), &api_version.into()),
            api_key,
            key_header: KeyHeader::AzureApiKey,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Build the Azure deployment URL
pub fn azure_endpoint_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        endpoint.trim_end_matches('/'),
        deployment,
        api_version
    )
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, LlmError> {
        let body = to_chat_request(request);
        debug!(url = %self.url, model = %body.model, turns = body.messages.len(), "sending chat completion");

        let builder = self.http_client.post(&self.url).json(&body);
        let builder = match self.key_header {
            KeyHeader::Bearer => builder.bearer_auth(self.api_key.expose()),
            KeyHeader::AzureApiKey => builder.header("api-key", self.api_key.expose()),
        };
        let response = builder.send().await?;

        let parsed: ChatCompletionResponse = read_json(response, "openai", describe_error).await?;
        from_chat_response(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::config::GenerationConfig;
    use crate::llm::core::types::{ConversationHistory, ConversationTurn};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            ConversationHistory::from(vec![
                ConversationTurn::system("Be terse."),
                ConversationTurn::user("Capital of France?"),
            ]),
            GenerationConfig::new("gpt-4o-mini"),
        )
    }

    fn ok_body() -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Paris."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 2, "total_tokens": 22}
        })
    }

    #[test]
    fn test_azure_endpoint_url_format() {
        let url = azure_endpoint_url("https://my-res.openai.azure.com/", "gpt4o", "2024-06-01");
        assert_eq!(
            url,
            "https://my-res.openai.azure.com/openai/deployments/gpt4o/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn test_openai_url_trims_slash() {
        let client = OpenAiClient::openai("https://api.openai.com/v1/", ApiKey::new("k")).unwrap();
        assert_eq!(client.url(), "https://api.openai.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_openai_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "temperature": 0.0,
                "messages": [
                    {"role": "system", "content": "Be terse."},
                    {"role": "user", "content": "Capital of France?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            OpenAiClient::openai(format!("{}/v1", server.uri()), ApiKey::new("sk-test")).unwrap();
        let result = client.complete(&request()).await.unwrap();

        assert_eq!(result.text, "Paris.");
        assert_eq!(result.metadata.usage.map(|u| u.total_tokens), Some(22));
    }

    #[tokio::test]
    async fn test_azure_completion_uses_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt4o/chat/completions"))
            .and(query_param("api-version", "2024-06-01"))
            .and(header("api-key", "azure-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            OpenAiClient::azure(server.uri(), "gpt4o", "2024-06-01", ApiKey::new("azure-key"))
                .unwrap();
        let result = client.complete(&request()).await.unwrap();
        assert_eq!(result.text, "Paris.");
    }

    #[tokio::test]
    async fn test_rate_limit_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_json(json!({"error": {"message": "Rate limit reached", "type": "requests"}})),
            )
            .mount(&server)
            .await;

        let client = OpenAiClient::openai(server.uri(), ApiKey::new("k")).unwrap();
        let err = client.complete(&request()).await.unwrap_err();

        match err {
            LlmError::RateLimitError { retry_after } => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)));
            }
            other => panic!("Expected RateLimitError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bad_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "model not found", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::openai(server.uri(), ApiKey::new("k")).unwrap();
        let err = client.complete(&request()).await.unwrap_err();

        match err {
            LlmError::InvalidRequestError(msg) => assert!(msg.contains("model not found")),
            other => panic!("Expected InvalidRequestError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = OpenAiClient::openai(server.uri(), ApiKey::new("k")).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::ServerError { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP connections locally
        let client = OpenAiClient::openai("http://127.0.0.1:9", ApiKey::new("k")).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::NetworkError(_)));
    }
}
