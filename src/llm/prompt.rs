//! History-aware prompt building
//!
//! Folds a conversation history and a new prompt into one payload string:
//!
//! ```text
//! user            <- role
//! hi              <- content, FIELD_SEPARATOR between them
//!                 <- TURN_SEPARATOR between turns
//! assistant
//! hello
//!
//! new prompt      <- TURN_SEPARATOR, then the prompt
//! ```
//!
//! The output depends only on the inputs. An empty history yields the prompt unchanged.

use crate::llm::core::error::LlmError;
use crate::llm::core::types::{ConversationHistory, ConversationTurn};

/// Between two turns, and between the last turn and the new prompt
pub const TURN_SEPARATOR: &str = "\n\n";
/// Between a turn's role and its content
pub const FIELD_SEPARATOR: &str = "\n";

/// Render one turn as `role\ncontent`
pub fn serialize_turn(turn: &ConversationTurn) -> String {
    format!("{}{}{}", turn.role().as_str(), FIELD_SEPARATOR, turn.content())
}

/// Render every turn, joined by [`TURN_SEPARATOR`]
pub fn serialize_history(history: &ConversationHistory) -> String {
    history
        .iter()
        .map(serialize_turn)
        .collect::<Vec<_>>()
        .join(TURN_SEPARATOR)
}

/// Build the single-string payload for `prompt` given the earlier `history`
///
/// # Errors
/// [`LlmError::InvalidInput`] when `prompt` is empty.
pub fn build(history: &ConversationHistory, prompt: &str) -> Result<String, LlmError> {
    validate_prompt(prompt)?;

    if history.is_empty() {
        return Ok(prompt.to_string());
    }

    let mut payload = serialize_history(history);
    payload.push_str(TURN_SEPARATOR);
    payload.push_str(prompt);
    Ok(payload)
}

/// Reject the empty prompt; any other text, whitespace included, is sent as is
pub fn validate_prompt(prompt: &str) -> Result<(), LlmError> {
    if prompt.is_empty() {
        return Err(LlmError::InvalidInput(
            "prompt must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}
