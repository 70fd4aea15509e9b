//! Human-readable observer that prints prompts and responses to stdout

use std::io::{self, Write};

use super::{RequestObserver, RequestOutcome};
use crate::llm::core::config::GenerationConfig;
use crate::llm::core::error::ObserverError;
use crate::llm::core::types::{ConversationHistory, RequestContext};
use crate::llm::prompt::serialize_history;

const PROMPT_OPEN: &str = "****************Prompt to LLM was:****************";
const PROMPT_CLOSE: &str = "*****************Prompt to LLM was:****************";
const RESPONSE_BANNER: &str = "*****************LLM response:****************";
const FAILURE_BANNER: &str = "*****************LLM request failed:****************";

/// Prints every outgoing prompt and every response between star banners
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }
}

/// Text printed before a request
pub fn format_prompt(history: &ConversationHistory) -> String {
    format!("{}\n{}\n{}\n", PROMPT_OPEN, serialize_history(history), PROMPT_CLOSE)
}

/// Text printed after a request
pub fn format_outcome(outcome: RequestOutcome<'_>) -> String {
    match outcome {
        Ok(result) => format!("{}\n{}\n{}\n", RESPONSE_BANNER, result.text, RESPONSE_BANNER),
        Err(err) => format!("{}\n{}\n{}\n", FAILURE_BANNER, err, FAILURE_BANNER),
    }
}

impl RequestObserver for ConsoleObserver {
    fn on_request_start(
        &self,
        _ctx: &RequestContext,
        _config: &GenerationConfig,
        history: &ConversationHistory,
    ) -> Result<(), ObserverError> {
        let mut out = io::stdout().lock();
        out.write_all(format_prompt(history).as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn on_request_end(
        &self,
        _ctx: &RequestContext,
        outcome: RequestOutcome<'_>,
    ) -> Result<(), ObserverError> {
        let mut out = io::stdout().lock();
        out.write_all(format_outcome(outcome).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
