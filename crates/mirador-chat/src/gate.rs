use crate::port::{AssistantError, AssistantPort};
use crate::prompt::{build_prompt, EMPTY_INPUT_REPLY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Awaiting,
}

/// One completed exchange. Turns are append-only and never mutated; `seq`
/// grows monotonically for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_text: String,
    pub assistant_text: String,
    pub seq: u64,
}

/// The domain-gated conversational unit. Holds the session's turn history
/// and delegates completions to the assistant collaborator; refusal is
/// enforced by the policy prompt, not by classifying the response.
pub struct ConversationGate {
    assistant: Arc<dyn AssistantPort>,
    history: Vec<ConversationTurn>,
    next_seq: u64,
    state: GateState,
}

impl ConversationGate {
    #[must_use]
    pub fn new(assistant: Arc<dyn AssistantPort>) -> Self {
        Self {
            assistant,
            history: Vec::new(),
            next_seq: 0,
            state: GateState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    #[must_use]
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Runs one turn. Empty input short-circuits without touching history or
    /// invoking the assistant. A failed invocation is converted to in-band
    /// text and the turn is appended with that text as the assistant side;
    /// either way the gate is back to Idle when this returns.
    pub async fn respond(&mut self, user_text: &str) -> String {
        if user_text.trim().is_empty() {
            return EMPTY_INPUT_REPLY.to_string();
        }

        self.state = GateState::Awaiting;
        let prompt = build_prompt(user_text);
        let reply = match self.assistant.complete(&prompt).await {
            Ok(text) => text,
            Err(err) => invocation_error_reply(&err),
        };
        self.push_turn(user_text, &reply);
        self.state = GateState::Idle;
        reply
    }

    fn push_turn(&mut self, user_text: &str, assistant_text: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.history.push(ConversationTurn {
            user_text: user_text.to_string(),
            assistant_text: assistant_text.to_string(),
            seq,
        });
    }
}

#[must_use]
pub(crate) fn invocation_error_reply(err: &AssistantError) -> String {
    format!("Error al procesar la respuesta: {err}")
}
