//! Claude-specific request and response types
//!
//! These map to the Anthropic Messages API. The Vertex AI variant of the same
//! API moves the model into the URL and the version into the body.

use serde::{Deserialize, Serialize};

/// Body of a Messages API call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    /// Model identifier (absent on Vertex AI, where it is part of the URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// API version (Vertex AI only; the public API takes it as a header)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,
    /// Maximum number of tokens to generate (required)
    pub max_tokens: u32,
    /// User and assistant messages, oldest first
    pub messages: Vec<ClaudeMessage>,
    /// System prompt (top-level field)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub temperature: f32,
}

/// A single message in the Claude conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaudeMessage {
    /// Role: "user" or "assistant"
    pub role: String,
    pub content: String,
}

/// Successful Messages API response
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<ClaudeContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<ClaudeUsage>,
}

/// A content block within a response
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaudeContentBlock {
    Text { text: String },
    /// Tool calls, thinking blocks and anything newer
    #[serde(other)]
    Other,
}

/// Usage metadata
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// Error envelope: `{"type":"error","error":{"type":...,"message":...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeErrorResponse {
    pub error: ClaudeErrorData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeErrorData {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}
