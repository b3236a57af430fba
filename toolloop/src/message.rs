//! Message types for the conversation log.
//!
//! Roles: System (optional, placed first), Human, Assistant and Tool. An assistant
//! message may request tool invocations; each invocation is answered by exactly one
//! Tool message carrying the same call id. Used by [`MessageLog`](crate::state::MessageLog)
//! and by every node that reads or appends messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool invocation requested by the reasoning step.
///
/// `arguments` is the structured argument object; the tool step validates it against
/// the registered schema before the handler runs. `id` correlates the request with the
/// Tool message that answers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Invocation id, echoed back as `Message::Tool::call_id`.
    pub id: String,
    /// Registered tool name.
    pub name: String,
    /// Structured arguments (normally a JSON object).
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A single message in the conversation.
///
/// Serialized with a `role` tag (`system`, `human`, `assistant`, `tool`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// System prompt; typically placed first in the message list.
    System { content: String },
    /// Human input.
    Human { content: String },
    /// Model reply; a non-empty `tool_calls` asks the dispatcher to run the tool step.
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// Result of one tool invocation. `is_error` marks unknown tools, rejected
    /// arguments and handler failures.
    Tool {
        call_id: String,
        name: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Creates a human message.
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    /// Creates an assistant message without tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls: vec![],
        }
    }

    /// Creates an assistant message that requests the given tool calls.
    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// Creates a successful tool-result message.
    pub fn tool_result(
        call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool {
            call_id: call_id.into(),
            name: name.into(),
            content: content.into(),
            is_error: false,
        }
    }

    /// Creates a tool-result message that reports a failure.
    pub fn tool_error(
        call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool {
            call_id: call_id.into(),
            name: name.into(),
            content: content.into(),
            is_error: true,
        }
    }

    /// Role tag as serialized (`"system"`, `"human"`, `"assistant"`, `"tool"`).
    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::Human { .. } => "human",
            Self::Assistant { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }

    /// Text content of the message.
    pub fn content(&self) -> &str {
        match self {
            Self::System { content }
            | Self::Human { content }
            | Self::Assistant { content, .. }
            | Self::Tool { content, .. } => content,
        }
    }

    /// Requested tool calls; empty for everything but an assistant message that asks for tools.
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }
}
