//! Mapping between abstraction types and Claude-specific types

use crate::llm::core::types::{
    CompletionRequest, CompletionResult, FinishReason, ResponseMetadata, Role, UsageMetadata,
};

use super::types::{
    ClaudeContentBlock, ClaudeErrorResponse, ClaudeMessage, MessagesRequest, MessagesResponse,
};

pub const VERTEX_ANTHROPIC_VERSION: &str = "vertex-2023-10-16";

/// Where the request is going; decides how model and version are carried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTarget {
    Anthropic,
    Vertex,
}

/// Convert our abstraction request to Claude's request format
///
/// System turns are lifted into the top-level `system` field, joined by a blank
/// line when there are several.
pub fn to_claude_request(request: &CompletionRequest, target: RequestTarget) -> MessagesRequest {
    let system_parts: Vec<&str> = request
        .history
        .iter()
        .filter(|turn| turn.role() == Role::System)
        .map(|turn| turn.content())
        .collect();

    let messages = request
        .history
        .iter()
        .filter(|turn| turn.role() != Role::System)
        .map(|turn| ClaudeMessage {
            role: turn.role().as_str().to_string(),
            content: turn.content().to_string(),
        })
        .collect();

    let (model, anthropic_version) = match target {
        RequestTarget::Anthropic => (Some(request.config.model.clone()), None),
        RequestTarget::Vertex => (None, Some(VERTEX_ANTHROPIC_VERSION.to_string())),
    };

    MessagesRequest {
        model,
        anthropic_version,
        max_tokens: request.config.max_tokens,
        messages,
        system: if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        },
        temperature: request.config.temperature,
    }
}

/// Convert Claude's response into a [`CompletionResult`]
///
/// All text blocks are concatenated in order; other block types are skipped.
pub fn from_claude_response(response: MessagesResponse) -> CompletionResult {
    let text = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ClaudeContentBlock::Text { text } => Some(text),
            ClaudeContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("");

    CompletionResult {
        text,
        metadata: ResponseMetadata {
            response_id: Some(response.id),
            model: response.model,
            finish_reason: response.stop_reason.as_deref().map(map_stop_reason),
            usage: response
                .usage
                .map(|usage| UsageMetadata::new(usage.input_tokens, usage.output_tokens)),
        },
    }
}

fn map_stop_reason(reason: &str) -> FinishReason {
    match reason {
        "end_turn" => FinishReason::Stop,
        "max_tokens" => FinishReason::MaxTokens,
        "stop_sequence" => FinishReason::StopSequence,
        "tool_use" => FinishReason::ToolUse,
        "refusal" => FinishReason::ContentFilter,
        other => FinishReason::Other(other.to_string()),
    }
}

/// Pull the message out of an error body, falling back to the raw text
pub fn describe_error(body: &str) -> String {
    match serde_json::from_str::<ClaudeErrorResponse>(body) {
        Ok(err) => format!("{}: {}", err.error.error_type, err.error.message),
        Err(_) => body.to_string(),
    }
}
