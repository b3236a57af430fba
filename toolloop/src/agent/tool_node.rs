//! Tool node: runs every tool call of the last assistant message and appends one
//! tool-result message per call, in request order.
//!
//! Tool failures never stop the loop. Unknown tools, rejected arguments and handler
//! errors become tool-result messages with `is_error` set so the model can recover.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node, RunContext};
use crate::message::{Message, ToolCall};
use crate::state::MessagesState;
use crate::tool_source::{ToolError, ToolSource};

use super::NODE_TOOLS;

/// Error text for a failed handler or rejected arguments.
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

/// Executes tool calls through a [`ToolSource`].
pub struct ToolNode {
    tools: Arc<dyn ToolSource>,
    parallel: bool,
}

impl ToolNode {
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self {
            tools,
            parallel: false,
        }
    }

    /// Runs the calls of one batch concurrently; results keep request order.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Tool-result messages for the invocations in the last message; empty when it has none.
    pub async fn execute(&self, messages: &[Message]) -> Vec<Message> {
        let calls = match messages.last() {
            Some(last) => last.tool_calls(),
            None => return vec![],
        };
        self.execute_calls(calls).await
    }

    pub async fn execute_calls(&self, calls: &[ToolCall]) -> Vec<Message> {
        if self.parallel {
            join_all(calls.iter().map(|c| self.call_one(c))).await
        } else {
            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                results.push(self.call_one(call).await);
            }
            results
        }
    }

    async fn call_one(&self, call: &ToolCall) -> Message {
        debug!(tool = %call.name, call_id = %call.id, args = %call.arguments, "calling tool");
        match self.tools.call_tool(&call.name, call.arguments.clone()).await {
            Ok(content) => {
                debug!(tool = %call.name, call_id = %call.id, "tool succeeded");
                Message::tool_result(&call.id, &call.name, content.text)
            }
            Err(error) => {
                warn!(tool = %call.name, call_id = %call.id, %error, "tool failed");
                let text = self.error_text(&error, &call.name, &call.arguments).await;
                Message::tool_error(&call.id, &call.name, text)
            }
        }
    }

    async fn error_text(&self, error: &ToolError, tool_name: &str, args: &Value) -> String {
        match error {
            ToolError::UnknownTool(_) => {
                let names = match self.tools.list_tools().await {
                    Ok(specs) => specs
                        .into_iter()
                        .map(|s| s.name)
                        .collect::<Vec<_>>()
                        .join(", "),
                    Err(_) => String::new(),
                };
                format!(
                    "Error: {} is not a valid tool, try one of [{}].",
                    tool_name, names
                )
            }
            ToolError::InvalidArguments(_) | ToolError::Execution(_) => {
                DEFAULT_EXECUTION_ERROR_TEMPLATE
                    .replace("{tool_name}", tool_name)
                    .replace("{tool_kwargs}", &args.to_string())
                    .replace("{error}", &error.to_string())
            }
        }
    }
}

#[async_trait]
impl Node<MessagesState> for ToolNode {
    fn id(&self) -> &str {
        NODE_TOOLS
    }

    async fn run(&self, state: MessagesState) -> Result<(MessagesState, Next), AgentError> {
        let results = self.execute(state.messages.as_slice()).await;
        Ok((MessagesState::update(results), Next::Continue))
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
    use crate::tools::{ToolRegistry, WeatherTool};
    use serde_json::json;

    fn node() -> ToolNode {
        let registry = ToolRegistry::builder()
            .register(WeatherTool::new())
            .unwrap()
            .build();
        ToolNode::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn unknown_tool_message_lists_registered_tools() {
        let call = ToolCall::new("c1", "weather_forecast", json!({"query": "sf"}));
        let out = node().execute_calls(&[call]).await;
        assert_eq!(out.len(), 1);
        match &out[0] {
            Message::Tool {
                call_id,
                content,
                is_error,
                ..
            } => {
                assert_eq!(call_id, "c1");
                assert!(*is_error);
                assert!(content.contains("weather_forecast is not a valid tool"), "{}", content);
                assert!(content.contains("[weather]"), "{}", content);
            }
            other => panic!("expected tool message, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_arguments_use_execution_template() {
        let call = ToolCall::new("c2", "weather", json!({"city": "sf"}));
        let out = node().execute_calls(&[call]).await;
        assert!(matches!(&out[0], Message::Tool { is_error: true, .. }));
        assert!(out[0].content().contains("Error executing tool 'weather'"), "{}", out[0].content());
        assert!(out[0].content().contains("invalid arguments"), "{}", out[0].content());
    }

    #[tokio::test]
    async fn no_tool_calls_appends_nothing() {
        let out = node().execute(&[Message::assistant("done")]).await;
        assert!(out.is_empty());
        assert!(node().execute(&[]).await.is_empty());
    }
}
