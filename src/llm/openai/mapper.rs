//! Mapping between abstraction types and Chat Completions types

use crate::llm::core::error::LlmError;
use crate::llm::core::types::{
    CompletionRequest, CompletionResult, FinishReason, ResponseMetadata, UsageMetadata,
};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatErrorResponse, ChatMessage};

/// Convert our abstraction request to a Chat Completions body
pub fn to_chat_request(request: &CompletionRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: request.config.model.clone(),
        messages: request
            .history
            .iter()
            .map(|turn| ChatMessage {
                role: turn.role().as_str().to_string(),
                content: turn.content().to_string(),
            })
            .collect(),
        temperature: request.config.temperature,
        max_tokens: Some(request.config.max_tokens),
    }
}

/// Take the top-ranked choice out of the response
///
/// A refusal stands in for missing content. A response without any choice is
/// reported as a server error.
pub fn from_chat_response(response: ChatCompletionResponse) -> Result<CompletionResult, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .min_by_key(|choice| choice.index)
        .ok_or_else(|| LlmError::ServerError {
            status: 200,
            body: "response contained no choices".to_string(),
        })?;

    let text = choice
        .message
        .content
        .or(choice.message.refusal)
        .unwrap_or_default();

    Ok(CompletionResult {
        text,
        metadata: ResponseMetadata {
            response_id: response.id,
            model: response.model,
            finish_reason: choice.finish_reason.as_deref().map(map_finish_reason),
            usage: response
                .usage
                .map(|usage| UsageMetadata::new(usage.prompt_tokens, usage.completion_tokens)),
        },
    })
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::MaxTokens,
        "content_filter" => FinishReason::ContentFilter,
        "tool_calls" | "function_call" => FinishReason::ToolUse,
        other => FinishReason::Other(other.to_string()),
    }
}

/// Pull the message out of an error body, falling back to the raw text
pub fn describe_error(body: &str) -> String {
    match serde_json::from_str::<ChatErrorResponse>(body) {
        Ok(err) => match err.error.error_type {
            Some(kind) => format!("{}: {}", kind, err.error.message),
            None => err.error.message,
        },
        Err(_) => body.to_string(),
    }
}
