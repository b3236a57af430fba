//! Graph state for the dispatch loop: a single append-only `messages` channel.

use serde::{Deserialize, Serialize};

use crate::channels::StateUpdater;
use crate::message::Message;

use super::MessageLog;

/// Conversation state flowing through the agent graph.
///
/// Nodes return a *partial* `MessagesState` holding only the messages they produced;
/// [`AppendMessages`] merges it into the running state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagesState {
    pub messages: MessageLog,
}

impl MessagesState {
    pub fn new(messages: impl Into<MessageLog>) -> Self {
        Self {
            messages: messages.into(),
        }
    }

    /// State seeded with one human message.
    pub fn from_human(text: impl Into<String>) -> Self {
        Self::new(vec![Message::human(text)])
    }

    /// Partial update carrying only the given new messages.
    pub fn update(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Content of the chronologically last assistant message, if any.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

/// Messages reducer: appends the update's messages to the current log.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendMessages;

impl StateUpdater<MessagesState> for AppendMessages {
    fn apply_update(&self, current: &mut MessagesState, update: &MessagesState) {
        current.messages.merge(&update.messages);
    }
}
