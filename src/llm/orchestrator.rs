//! Runs a completion with observer hooks around it
//!
//! For every request the orchestrator:
//! - validates the request, returning `InvalidInput` before anything else happens
//! - calls `on_request_start` on each observer, in registration order
//! - calls the completion client exactly once
//! - calls `on_request_end` on each observer with the result or the error
//! - returns the client's outcome unchanged
//!
//! Observer failures, panics included, are logged and dropped. Nothing is retried.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::llm::core::{
    error::{LlmError, ObserverError},
    provider::CompletionClient,
    types::{CompletionRequest, CompletionResult, RequestContext},
};
use crate::llm::observer::RequestObserver;

/// Completion client plus the observers watching it
pub struct Orchestrator {
    client: Box<dyn CompletionClient>,
    observers: Vec<Box<dyn RequestObserver>>,
}

impl Orchestrator {
    pub fn new(client: Box<dyn CompletionClient>) -> Self {
        Self {
            client,
            observers: Vec::new(),
        }
    }

    /// Register an observer; observers fire in the order they were added
    pub fn with_observer(mut self, observer: impl RequestObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Register an already boxed observer
    pub fn add_observer(&mut self, observer: Box<dyn RequestObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Send `request` through the client with hooks around the call
    pub async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult, LlmError> {
        validate_request(&request)?;

        let ctx = RequestContext::new();
        for observer in &self.observers {
            run_hook(&ctx, "on_request_start", || {
                observer.on_request_start(&ctx, &request.config, &request.history)
            });
        }

        let outcome = self.client.complete(&request).await;

        for observer in &self.observers {
            run_hook(&ctx, "on_request_end", || {
                observer.on_request_end(&ctx, outcome.as_ref())
            });
        }

        outcome
    }
}

/// Run one hook, logging an error or a panic instead of letting it reach the caller
fn run_hook<F>(ctx: &RequestContext, hook: &'static str, f: F)
where
    F: FnOnce() -> Result<(), ObserverError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(request_id = %ctx.request_id, hook, error = %e, "observer hook failed");
        }
        Err(payload) => {
            warn!(
                request_id = %ctx.request_id,
                hook,
                panic = %panic_message(payload.as_ref()),
                "observer hook panicked"
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

fn validate_request(request: &CompletionRequest) -> Result<(), LlmError> {
    if request.history.is_empty() {
        return Err(LlmError::InvalidInput(
            "conversation history must contain at least one turn".to_string(),
        ));
    }
    request.config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::config::GenerationConfig;
    use crate::llm::core::types::{ConversationHistory, ConversationTurn, ResponseMetadata};
    use crate::llm::observer::FnObserver;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    // Mock client that records the order of events it sees
    struct MockClient {
        log: Arc<Mutex<Vec<String>>>,
        fail_with_auth: bool,
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResult, LlmError> {
            self.log.lock().unwrap().push("client".to_string());
            if self.fail_with_auth {
                return Err(LlmError::AuthenticationError("invalid api key".to_string()));
            }
            let last = request.history.last().map(|t| t.content()).unwrap_or("");
            Ok(CompletionResult {
                text: format!("echo: {}", last),
                metadata: ResponseMetadata::default(),
            })
        }
    }

    fn recording_observer(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> FnObserver {
        let start_log = log.clone();
        FnObserver::new()
            .on_start(move |_, _, _| {
                start_log.lock().unwrap().push(format!("{}:start", name));
                Ok(())
            })
            .on_end(move |_, outcome| {
                let tag = if outcome.is_ok() { "ok" } else { "err" };
                log.lock().unwrap().push(format!("{}:end:{}", name, tag));
                Ok(())
            })
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            ConversationHistory::from(vec![ConversationTurn::user("ping")]),
            GenerationConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_hooks_wrap_client_call() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = Orchestrator::new(Box::new(MockClient {
            log: log.clone(),
            fail_with_auth: false,
        }))
        .with_observer(recording_observer("a", log.clone()))
        .with_observer(recording_observer("b", log.clone()));

        let result = orchestrator.complete(request()).await.unwrap();

        assert_eq!(result.text, "echo: ping");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:start", "b:start", "client", "a:end:ok", "b:end:ok"]
        );
    }

    #[tokio::test]
    async fn test_end_hook_fires_on_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = Orchestrator::new(Box::new(MockClient {
            log: log.clone(),
            fail_with_auth: true,
        }))
        .with_observer(recording_observer("a", log.clone()));

        let err = orchestrator.complete(request()).await.unwrap_err();

        assert!(matches!(err, LlmError::AuthenticationError(_)));
        assert_eq!(*log.lock().unwrap(), vec!["a:start", "client", "a:end:err"]);
    }

    #[tokio::test]
    async fn test_failing_observer_does_not_abort_request() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let broken = FnObserver::new()
            .on_start(|_, _, _| Err(ObserverError::new("start broke")))
            .on_end(|_, _| Err(ObserverError::new("end broke")));

        let orchestrator = Orchestrator::new(Box::new(MockClient {
            log: log.clone(),
            fail_with_auth: false,
        }))
        .with_observer(broken)
        .with_observer(recording_observer("after", log.clone()));

        let result = orchestrator.complete(request()).await.unwrap();

        assert_eq!(result.text, "echo: ping");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["after:start", "client", "after:end:ok"]
        );
    }

    #[tokio::test]
    async fn test_panicking_observer_does_not_abort_request() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let panicking = FnObserver::new()
            .on_start(|_, _, _| panic!("observer bug"))
            .on_end(|_, _| panic!("observer bug"));

        let orchestrator = Orchestrator::new(Box::new(MockClient {
            log: log.clone(),
            fail_with_auth: false,
        }))
        .with_observer(panicking)
        .with_observer(recording_observer("after", log.clone()));

        let result = orchestrator.complete(request()).await.unwrap();

        assert_eq!(result.text, "echo: ping");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["after:start", "client", "after:end:ok"]
        );
    }

    #[test]
    fn test_panic_message() {
        let caught = panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "static message");

        let caught = panic::catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "formatted 42");
    }

    #[tokio::test]
    async fn test_invalid_request_skips_hooks_and_client() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = Orchestrator::new(Box::new(MockClient {
            log: log.clone(),
            fail_with_auth: false,
        }))
        .with_observer(recording_observer("a", log.clone()));

        let empty = CompletionRequest::new(ConversationHistory::new(), GenerationConfig::default());
        assert!(matches!(
            orchestrator.complete(empty).await,
            Err(LlmError::InvalidInput(_))
        ));

        let too_hot = CompletionRequest::new(
            ConversationHistory::from(vec![ConversationTurn::user("hi")]),
            GenerationConfig::default().with_temperature(3.0),
        );
        assert!(matches!(
            orchestrator.complete(too_hot).await,
            Err(LlmError::InvalidInput(_))
        ));

        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_observers_see_request_unchanged() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::new(Mutex::new(None));
        let seen_in_hook = seen.clone();
        let observer = FnObserver::new().on_start(move |_, config, history| {
            *seen_in_hook.lock().unwrap() = Some((config.clone(), history.clone()));
            Ok(())
        });

        let orchestrator = Orchestrator::new(Box::new(MockClient {
            log,
            fail_with_auth: false,
        }))
        .with_observer(observer);

        let req = request();
        orchestrator.complete(req.clone()).await.unwrap();

        let (config, history) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(config, req.config);
        assert_eq!(history, req.history);
    }

    #[test]
    fn test_observer_count() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut orchestrator = Orchestrator::new(Box::new(MockClient {
            log,
            fail_with_auth: false,
        }));
        assert_eq!(orchestrator.observer_count(), 0);
        orchestrator.add_observer(Box::new(FnObserver::new()));
        assert_eq!(orchestrator.observer_count(), 1);
    }
}
