//! Model node: asks the reasoning step for the next assistant message.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AgentError;
use crate::graph::{Next, Node, RunContext};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::MessagesState;

use super::NODE_AGENT;

/// Calls the [`LlmClient`] with the whole conversation and appends its reply.
///
/// As a graph node it returns only the new message; the graph's
/// [`AppendMessages`](crate::state::AppendMessages) updater appends it.
pub struct ModelNode {
    llm: Arc<dyn LlmClient>,
}

impl ModelNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// One reasoning step over `messages`. An empty conversation is rejected.
    pub async fn reply(&self, messages: &[Message]) -> Result<Message, AgentError> {
        if messages.is_empty() {
            return Err(AgentError::EmptyState);
        }
        let response = self.llm.invoke(messages).await?;
        debug!(
            message_count = messages.len(),
            tool_calls = response.tool_calls.len(),
            usage = ?response.usage,
            "model replied"
        );
        Ok(response.into_message())
    }
}

#[async_trait]
impl Node<MessagesState> for ModelNode {
    fn id(&self) -> &str {
        NODE_AGENT
    }

    async fn run(&self, state: MessagesState) -> Result<(MessagesState, Next), AgentError> {
        let reply = self.reply(state.messages.as_slice()).await?;
        Ok((MessagesState::update(vec![reply]), Next::Continue))
    }

    async fn run_with_context(
        &self,
        state: MessagesState,
        ctx: &RunContext<MessagesState>,
    ) -> Result<(MessagesState, Next), AgentError> {
        ctx.config.guard(self.run(state)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;

    #[tokio::test]
    async fn run_returns_only_the_new_message() {
        let node = ModelNode::new(Arc::new(MockLlm::with_no_tool_calls("hello")));
        let (update, next) = node.run(MessagesState::from_human("hi")).await.unwrap();
        assert_eq!(update.messages.as_slice(), &[Message::assistant("hello")]);
        assert_eq!(next, Next::Continue);
    }

    #[tokio::test]
    async fn empty_state_is_rejected() {
        let node = ModelNode::new(Arc::new(MockLlm::with_no_tool_calls("hello")));
        let err = node.run(MessagesState::default()).await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyState));
    }
}
