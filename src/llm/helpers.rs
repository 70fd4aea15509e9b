//! One-call helpers for prompting a model
//!
//! Every helper sends a fixed system prompt followed by a single user turn.
//! Prompts are validated before anything is sent, so an empty prompt never
//! costs a request.

use std::io::Write;

use tracing::warn;

use crate::llm::core::{
    config::GenerationConfig,
    error::LlmError,
    types::{CompletionRequest, ConversationHistory, ConversationTurn},
};
use crate::llm::orchestrator::Orchestrator;
use crate::llm::prompt;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful but terse AI assistant who gets straight to the point.";

const RULE_WIDTH: usize = 100;

/// Sends prompts through an [`Orchestrator`] with a fixed configuration
pub struct PromptRunner {
    orchestrator: Orchestrator,
    config: GenerationConfig,
    system_prompt: String,
}

impl PromptRunner {
    pub fn new(orchestrator: Orchestrator, config: GenerationConfig) -> Self {
        Self {
            orchestrator,
            config,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the system prompt sent ahead of every user turn
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Send `prompt` and return the response text
    pub async fn get_response(&self, prompt: &str) -> Result<String, LlmError> {
        prompt::validate_prompt(prompt)?;
        self.send(prompt.to_string()).await
    }

    /// Send `prompt`, write the response to `out` between horizontal rules and return it
    ///
    /// Console output is best effort: a failed write is logged, not returned.
    pub async fn print_response<W: Write>(
        &self,
        prompt: &str,
        out: &mut W,
    ) -> Result<String, LlmError> {
        let response = self.get_response(prompt).await?;
        if let Err(e) = write_framed(out, &response) {
            warn!(error = %e, "failed to print response");
        }
        Ok(response)
    }

    /// Send `prompt` with the earlier `history` folded into the same user turn
    ///
    /// The history is serialized by [`prompt::build`]; the caller keeps owning it.
    pub async fn chat_completion(
        &self,
        prompt: &str,
        history: &ConversationHistory,
    ) -> Result<String, LlmError> {
        let payload = prompt::build(history, prompt)?;
        self.send(payload).await
    }

    async fn send(&self, user_content: String) -> Result<String, LlmError> {
        let history = ConversationHistory::from(vec![
            ConversationTurn::system(self.system_prompt.clone()),
            ConversationTurn::user(user_content),
        ]);
        let request = CompletionRequest::new(history, self.config.clone());
        let result = self.orchestrator.complete(request).await?;
        Ok(result.text)
    }
}

fn write_framed<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    let rule = "_".repeat(RULE_WIDTH);
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", text)?;
    writeln!(out, "{}", rule)?;
    writeln!(out)?;
    out.flush()
}
