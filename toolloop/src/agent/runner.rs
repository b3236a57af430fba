//! Agent graph wiring and the runner around it.
//!
//! Graph: `START → agent`, `agent --tools_condition--> {tools, END}`, `tools → agent`,
//! plus a plain `agent → END` edge that compiles to nothing because the router already
//! covers that exit.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_stream::StreamExt;

use crate::error::AgentError;
use crate::graph::{
    CompilationError, CompiledStateGraph, LoggingNodeMiddleware, RunConfig, StateGraph, END, START,
};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::{AppendMessages, MessagesState};
use crate::stream::{StreamEvent, StreamMode};
use crate::tool_source::ToolSource;
use crate::tools::RegistryError;

use super::{tools_condition, ModelNode, ToolNode, NODE_AGENT, NODE_TOOLS};

/// Error from building or running the agent.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("tool registration failed: {0}")]
    Registry(#[from] RegistryError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
    #[error("stream ended without final state")]
    StreamEndedWithoutState,
}

/// Options for [`build_agent_graph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentGraphOptions {
    /// Wrap nodes in [`LoggingNodeMiddleware`].
    pub verbose: bool,
    /// Run one batch of tool calls concurrently.
    pub parallel_tools: bool,
}

/// Compiles the model/tool loop over `MessagesState` with the append reducer.
pub fn build_agent_graph(
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    options: AgentGraphOptions,
) -> Result<CompiledStateGraph<MessagesState>, CompilationError> {
    let path_map: HashMap<String, String> = [
        (NODE_TOOLS.to_string(), NODE_TOOLS.to_string()),
        (END.to_string(), END.to_string()),
    ]
    .into_iter()
    .collect();

    let mut graph = StateGraph::<MessagesState>::new().with_state_updater(Arc::new(AppendMessages));
    if options.verbose {
        graph = graph.with_middleware(Arc::new(LoggingNodeMiddleware::<MessagesState>::new()));
    }
    graph
        .add_node(NODE_AGENT, Arc::new(ModelNode::new(llm)))
        .add_node(
            NODE_TOOLS,
            Arc::new(ToolNode::new(tools).with_parallel(options.parallel_tools)),
        )
        .add_edge(START, NODE_AGENT)
        .add_conditional_edges(NODE_AGENT, Arc::new(tools_condition), Some(path_map))
        .add_edge(NODE_TOOLS, NODE_AGENT)
        .add_edge(NODE_AGENT, END);
    graph.compile()
}

/// Runs the compiled agent graph for one user message at a time.
pub struct AgentRunner {
    graph: CompiledStateGraph<MessagesState>,
    system_prompt: Option<String>,
}

impl AgentRunner {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<dyn ToolSource>,
        options: AgentGraphOptions,
    ) -> Result<Self, RunError> {
        Ok(Self {
            graph: build_agent_graph(llm, tools, options)?,
            system_prompt: None,
        })
    }

    /// Seeds every run with a system message before the user message.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn graph(&self) -> &CompiledStateGraph<MessagesState> {
        &self.graph
    }

    fn initial_state(&self, user_message: &str) -> MessagesState {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = &self.system_prompt {
            messages.push(Message::system(prompt.as_str()));
        }
        messages.push(Message::human(user_message));
        MessagesState::new(messages)
    }

    /// Runs to completion and returns the final state.
    pub async fn invoke(
        &self,
        user_message: &str,
        config: Option<RunConfig>,
    ) -> Result<MessagesState, RunError> {
        let state = self.initial_state(user_message);
        Ok(self.graph.invoke(state, config).await?)
    }

    /// Streams values and task events to `on_event`; returns the last `Values` state.
    ///
    /// A failed run (node error, recursion limit, cancellation) is reported as
    /// `RunError::Execution` with the same error `invoke` would return.
    pub async fn stream_with_callback<F>(
        &self,
        user_message: &str,
        config: Option<RunConfig>,
        mut on_event: F,
    ) -> Result<MessagesState, RunError>
    where
        F: FnMut(&StreamEvent<MessagesState>),
    {
        let state = self.initial_state(user_message);
        let mut stream = self.graph.stream(
            state,
            config,
            [StreamMode::Values, StreamMode::Tasks],
        );
        let mut last = None;
        while let Some(event) = stream.next().await {
            on_event(&event);
            match event {
                StreamEvent::Values(s) => last = Some(s),
                StreamEvent::Error(err) => return Err(RunError::Execution(err)),
                _ => {}
            }
        }
        last.ok_or(RunError::StreamEndedWithoutState)
    }
}
