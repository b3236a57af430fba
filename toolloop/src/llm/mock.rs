//! Scripted model for tests and the `--mock` demo path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::AgentError;
use crate::message::{Message, ToolCall};

use super::{LlmClient, LlmResponse};

/// One scripted turn.
#[derive(Clone, Debug)]
pub enum MockTurn {
    /// Return this response as is.
    Respond(LlmResponse),
    /// Answer in text with the contents of the trailing tool-result messages.
    SummarizeToolResults,
    /// Fail the reasoning step with this message.
    Fail(String),
}

/// Scripted [`LlmClient`]: turns are consumed in order and the last one repeats.
///
/// ```rust
/// use toolloop::llm::{LlmClient, MockLlm};
/// use toolloop::Message;
///
/// # async fn demo() -> Result<(), toolloop::AgentError> {
/// let llm = MockLlm::with_no_tool_calls("hello");
/// let out = llm.invoke(&[Message::human("hi")]).await?;
/// assert_eq!(out.content, "hello");
/// # Ok(())
/// # }
/// ```
pub struct MockLlm {
    turns: Vec<MockTurn>,
    next: AtomicUsize,
    delay: Option<Duration>,
}

impl MockLlm {
    /// Fixed responses, in order.
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        Self::scripted(responses.into_iter().map(MockTurn::Respond).collect())
    }

    pub fn scripted(turns: Vec<MockTurn>) -> Self {
        Self {
            turns,
            next: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Always answers `content` without tool calls.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::new(vec![LlmResponse::text(content)])
    }

    /// Every call fails with `AgentError::ReasoningStep(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::scripted(vec![MockTurn::Fail(message.into())])
    }

    /// First turn calls `weather({"query": query})`, second turn reports the tool result.
    pub fn weather_round_trip(query: impl Into<String>) -> Self {
        let call = ToolCall::new("call_weather_1", "weather", json!({ "query": query.into() }));
        Self::scripted(vec![
            MockTurn::Respond(LlmResponse::with_tool_calls("", vec![call])),
            MockTurn::SummarizeToolResults,
        ])
    }

    /// Sleeps this long before answering (for cancellation tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }

    fn summarize(messages: &[Message]) -> LlmResponse {
        let results: Vec<&str> = messages
            .iter()
            .rev()
            .take_while(|m| matches!(m, Message::Tool { .. }))
            .map(Message::content)
            .collect();
        if results.is_empty() {
            return LlmResponse::text("I have no tool results to report.");
        }
        let joined = results.into_iter().rev().collect::<Vec<_>>().join(" ");
        LlmResponse::text(format!("Here is what I found: {}", joined))
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let turn = match self.turns.get(n).or_else(|| self.turns.last()) {
            Some(turn) => turn,
            None => return Err(AgentError::ReasoningStep("mock has no scripted turns".into())),
        };
        match turn {
            MockTurn::Respond(response) => Ok(response.clone()),
            MockTurn::SummarizeToolResults => Ok(Self::summarize(messages)),
            MockTurn::Fail(message) => Err(AgentError::ReasoningStep(message.clone())),
        }
    }
}
