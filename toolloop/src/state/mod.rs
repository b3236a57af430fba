//! Conversation state types.
//!
//! The dispatch loop carries exactly one piece of state between turns: the
//! append-only [`MessageLog`]. [`MessagesState`] wraps it for use as a graph state
//! and [`AppendMessages`] is the reducer that merges node updates into it.
//!
//! # Example
//!
//! ```rust
//! use toolloop::{Message, MessagesState};
//!
//! let mut state = MessagesState::from_human("What is the weather in sf");
//! state.messages.push(Message::assistant("Let me check."));
//! assert_eq!(state.messages.len(), 2);
//! ```

mod message_log;
mod messages_state;

pub use message_log::MessageLog;
pub use messages_state::{AppendMessages, MessagesState};
