//! Observer that emits structured `tracing` events

use tracing::{info, warn};

use super::{RequestObserver, RequestOutcome};
use crate::llm::core::config::GenerationConfig;
use crate::llm::core::error::ObserverError;
use crate::llm::core::types::{ConversationHistory, RequestContext};

/// Logs one event when a request starts and one when it ends
///
/// Prompt and response text are not logged, only their sizes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl RequestObserver for TracingObserver {
    fn on_request_start(
        &self,
        ctx: &RequestContext,
        config: &GenerationConfig,
        history: &ConversationHistory,
    ) -> Result<(), ObserverError> {
        info!(
            request_id = %ctx.request_id,
            model = %config.model,
            temperature = config.temperature,
            turns = history.len(),
            "completion request started"
        );
        Ok(())
    }

    fn on_request_end(
        &self,
        ctx: &RequestContext,
        outcome: RequestOutcome<'_>,
    ) -> Result<(), ObserverError> {
        let elapsed_ms = ctx.elapsed_ms();
        match outcome {
            Ok(result) => {
                let usage = result.metadata.usage;
                info!(
                    request_id = %ctx.request_id,
                    elapsed_ms,
                    chars = result.text.chars().count(),
                    input_tokens = usage.map(|u| u.input_tokens),
                    output_tokens = usage.map(|u| u.output_tokens),
                    finish_reason = ?result.metadata.finish_reason,
                    "completion request finished"
                );
            }
            Err(err) => {
                warn!(
                    request_id = %ctx.request_id,
                    elapsed_ms,
                    retryable = err.is_retryable(),
                    error = %err,
                    "completion request failed"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::error::LlmError;
    use crate::llm::core::types::{CompletionResult, ResponseMetadata, UsageMetadata};

    #[test]
    fn test_hooks_never_fail() {
        let observer = TracingObserver::new();
        let ctx = RequestContext::new();
        let result = CompletionResult {
            text: "fine".to_string(),
            metadata: ResponseMetadata {
                usage: Some(UsageMetadata::new(3, 1)),
                ..ResponseMetadata::default()
            },
        };
        let err = LlmError::RateLimitError { retry_after: None };

        assert!(observer
            .on_request_start(&ctx, &GenerationConfig::default(), &ConversationHistory::new())
            .is_ok());
        assert!(observer.on_request_end(&ctx, Ok(&result)).is_ok());
        assert!(observer.on_request_end(&ctx, Err(&err)).is_ok());
    }
}
