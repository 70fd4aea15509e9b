//! LLM completion layer
//!
//! A single [`CompletionClient`] interface with one implementation per provider
//! (OpenAI, Azure OpenAI, Anthropic, Claude on Vertex AI), observer hooks run
//! around each call by the [`Orchestrator`], and a history-aware prompt builder.

pub mod auth;
pub mod claude;
pub mod core;
pub mod helpers;
pub mod http;
pub mod observer;
pub mod openai;
pub mod orchestrator;
pub mod prompt;

// Re-export commonly used types
pub use self::core::{
    config::{GenerationConfig, ProviderConfig, ProviderKind, Settings, SettingsOverrides},
    error::{LlmError, ObserverError},
    provider::{create_client, CompletionClient},
    types::{
        CompletionRequest, CompletionResult, ConversationHistory, ConversationTurn, FinishReason,
        RequestContext, ResponseMetadata, Role, UsageMetadata,
    },
};

pub use auth::{ApiKey, CredentialRef};
pub use helpers::{PromptRunner, DEFAULT_SYSTEM_PROMPT};
pub use observer::{ConsoleObserver, FnObserver, RequestObserver, RequestOutcome, TracingObserver};
pub use orchestrator::Orchestrator;
