//! Explicit dispatch loop: model turn, route, tool batch, repeat until the model answers
//! without tool calls.
//!
//! Same behavior as the compiled agent graph, driven by [`Phase`] instead of edges.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AgentError;
use crate::graph::{RunConfig, DEFAULT_RECURSION_LIMIT};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::MessagesState;
use crate::tool_source::ToolSource;

use super::{route, ModelNode, Phase, Route, ToolNode};

/// Drives one conversation through model and tool steps.
pub struct Dispatcher {
    model: ModelNode,
    tools: ToolNode,
}

impl Dispatcher {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolSource>) -> Self {
        Self {
            model: ModelNode::new(llm),
            tools: ToolNode::new(tools),
        }
    }

    pub fn with_parallel_tools(mut self, parallel: bool) -> Self {
        self.tools = self.tools.with_parallel(parallel);
        self
    }

    /// Appends the model's next message. Fails with `EmptyState` on an empty log and
    /// with `ReasoningStep` when the model call fails.
    pub async fn step(&self, mut state: MessagesState) -> Result<MessagesState, AgentError> {
        let reply = self.model.reply(state.messages.as_slice()).await?;
        state.messages.push(reply);
        Ok(state)
    }

    pub fn route(state: &MessagesState) -> Route {
        route(state.messages.as_slice())
    }

    /// Appends one tool-result message per invocation in the last message.
    pub async fn execute(&self, mut state: MessagesState) -> Result<MessagesState, AgentError> {
        let results = self.tools.execute(state.messages.as_slice()).await;
        state.messages.extend(results);
        Ok(state)
    }

    /// Runs from `AwaitingModel` to `Done` and returns the full message log.
    ///
    /// Each model or tool step counts against the recursion limit (default 25).
    pub async fn run(
        &self,
        initial_messages: Vec<Message>,
        config: Option<RunConfig>,
    ) -> Result<Vec<Message>, AgentError> {
        let config = config.unwrap_or_default();
        let thread_id = config.thread_id.as_deref();
        let limit = config.recursion_limit.unwrap_or(DEFAULT_RECURSION_LIMIT);
        let mut state = MessagesState::new(initial_messages);
        if state.messages.is_empty() {
            return Err(AgentError::EmptyState);
        }
        info!(thread_id, "dispatcher run started");

        let mut phase = Phase::AwaitingModel;
        let mut steps = 0usize;
        while !phase.is_done() {
            if config.is_cancelled() {
                return Err(AgentError::Cancelled);
            }
            if steps >= limit {
                return Err(AgentError::RecursionLimit(limit));
            }
            steps += 1;
            state = match phase {
                Phase::AwaitingModel => config.guard(self.step(state)).await?,
                Phase::AwaitingTool => config.guard(self.execute(state)).await?,
                Phase::Done => break,
            };
            let next = phase.advance(Self::route(&state));
            debug!(thread_id, step = steps, from = ?phase, to = ?next, "phase advanced");
            phase = next;
        }

        info!(thread_id, steps, messages = state.messages.len(), "dispatcher run complete");
        Ok(state.messages.into_vec())
    }
}
