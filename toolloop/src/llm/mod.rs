//! Reasoning-step clients.
//!
//! The model node calls an [`LlmClient`] with the full conversation and turns the
//! [`LlmResponse`] into one assistant message. Implementations: [`MockLlm`] (scripted, no
//! network) and [`ChatOpenAI`] (any OpenAI-compatible chat completions endpoint, Groq included).

mod mock;
mod openai;

pub use mock::{MockLlm, MockTurn};
pub use openai::{ChatOpenAI, GROQ_API_BASE, GROQ_API_KEY_ENV};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::message::{Message, ToolCall};

/// Tool choice mode for chat completions when tools are bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolChoiceMode {
    /// Model picks between a text reply and tool calls.
    #[default]
    Auto,
    /// Model will not call any tool.
    None,
    /// Model must call one or more tools.
    Required,
}

impl std::str::FromStr for ToolChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "required" => Ok(Self::Required),
            _ => Err(format!(
                "unknown tool_choice: {} (use auto, none, or required)",
                s
            )),
        }
    }
}

/// Token usage for one model call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One reasoning-step result: reply text plus requested tool calls.
///
/// Empty `tool_calls` means the model answered and the loop terminates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    /// Text-only reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Reply that requests tool calls.
    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
            usage: None,
        }
    }

    /// The assistant message appended to the conversation.
    pub fn into_message(self) -> Message {
        Message::assistant_with_tool_calls(self.content, self.tool_calls)
    }
}

/// Reasoning step: given the conversation so far, produce the next assistant turn.
///
/// Any failure must be reported as `AgentError::ReasoningStep`; the loop does not retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}
