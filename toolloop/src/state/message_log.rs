//! Append-only message log: the conversation state carried between turns.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Ordered, append-only sequence of messages.
///
/// There is no API to remove or reorder entries; the only merge rule is
/// concatenation in arrival order ([`MessageLog::merge`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLog(Vec<Message>);

impl MessageLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, message: Message) {
        self.0.push(message);
    }

    pub fn extend<I: IntoIterator<Item = Message>>(&mut self, messages: I) {
        self.0.extend(messages);
    }

    /// Appends every message of `other` after the existing ones.
    pub fn merge(&mut self, other: &MessageLog) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn last(&self) -> Option<&Message> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Message> {
        self.0
    }
}

impl From<Vec<Message>> for MessageLog {
    fn from(messages: Vec<Message>) -> Self {
        Self(messages)
    }
}

impl FromIterator<Message> for MessageLog {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MessageLog {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
