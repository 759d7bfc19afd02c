//! Per-agent conversation state — the ordered message history sent as
//! context on every inference call.

use crate::client::ChatMessage;

/// Append-only message history for one agent.
///
/// Seeded with exactly one system message (the agent's persona). Message
/// order is call order; nothing is reordered or pruned for the lifetime of a
/// run, which is bounded to a handful of rounds.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// New history holding only the persona system message.
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(persona)],
        }
    }

    /// Snapshot context for a call: the history plus a pending user message.
    /// Does not mutate the history — the exchange is recorded only after the
    /// call resolves.
    pub fn with_user(&self, content: &str) -> Vec<ChatMessage> {
        let mut context = self.messages.clone();
        context.push(ChatMessage::user(content));
        context
    }

    /// Record one completed exchange: the instruction sent and the response
    /// received, in that order.
    pub fn record_exchange(&mut self, user: &str, assistant: &str) {
        self.messages.push(ChatMessage::user(user));
        self.messages.push(ChatMessage::assistant(assistant));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
