//! Observer hooks around a completion call
//!
//! An orchestrator calls [`RequestObserver::on_request_start`] right before the
//! client is invoked and [`RequestObserver::on_request_end`] right after it
//! returns, once per request, whether the call succeeded or not. Observers only
//! see shared references, so they cannot alter what is sent or returned. A hook
//! that fails returns an [`ObserverError`]; the orchestrator logs it and the
//! request carries on.

pub mod console;
pub mod logging;

pub use console::ConsoleObserver;
pub use logging::TracingObserver;

use crate::llm::core::config::GenerationConfig;
use crate::llm::core::error::{LlmError, ObserverError};
use crate::llm::core::types::{CompletionResult, ConversationHistory, RequestContext};

/// Outcome handed to [`RequestObserver::on_request_end`]
pub type RequestOutcome<'a> = Result<&'a CompletionResult, &'a LlmError>;

/// Side-effect-only hooks invoked around each completion
pub trait RequestObserver: Send + Sync {
    /// Called before the client is invoked
    fn on_request_start(
        &self,
        _ctx: &RequestContext,
        _config: &GenerationConfig,
        _history: &ConversationHistory,
    ) -> Result<(), ObserverError> {
        Ok(())
    }

    /// Called after the client returned, with its result or its error
    fn on_request_end(
        &self,
        _ctx: &RequestContext,
        _outcome: RequestOutcome<'_>,
    ) -> Result<(), ObserverError> {
        Ok(())
    }
}

type StartHook = Box<
    dyn Fn(&RequestContext, &GenerationConfig, &ConversationHistory) -> Result<(), ObserverError>
        + Send
        + Sync,
>;
type EndHook =
    Box<dyn Fn(&RequestContext, RequestOutcome<'_>) -> Result<(), ObserverError> + Send + Sync>;

/// Observer assembled from plain closures
///
/// ```rust
/// use llm_hooks::llm::observer::FnObserver;
///
/// let observer = FnObserver::new()
///     .on_start(|_ctx, config, history| {
///         println!("sending {} turns to {}", history.len(), config.model);
///         Ok(())
///     })
///     .on_end(|_ctx, outcome| {
///         println!("succeeded: {}", outcome.is_ok());
///         Ok(())
///     });
/// # let _ = observer;
/// ```
#[derive(Default)]
pub struct FnObserver {
    start: Option<StartHook>,
    end: Option<EndHook>,
}

impl FnObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestContext, &GenerationConfig, &ConversationHistory) -> Result<(), ObserverError>
            + Send
            + Sync
            + 'static,
    {
        self.start = Some(Box::new(hook));
        self
    }

    pub fn on_end<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestContext, RequestOutcome<'_>) -> Result<(), ObserverError>
            + Send
            + Sync
            + 'static,
    {
        self.end = Some(Box::new(hook));
        self
    }
}

impl RequestObserver for FnObserver {
    fn on_request_start(
        &self,
        ctx: &RequestContext,
        config: &GenerationConfig,
        history: &ConversationHistory,
    ) -> Result<(), ObserverError> {
        match &self.start {
            Some(hook) => hook(ctx, config, history),
            None => Ok(()),
        }
    }

    fn on_request_end(
        &self,
        ctx: &RequestContext,
        outcome: RequestOutcome<'_>,
    ) -> Result<(), ObserverError> {
        match &self.end {
            Some(hook) => hook(ctx, outcome),
            None => Ok(()),
        }
    }
}
