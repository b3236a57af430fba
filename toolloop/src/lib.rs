//! # toolloop
//!
//! A minimal model/tool dispatch loop. A conversation is an append-only log of
//! [`Message`]s; on every turn a reasoning step ([`LlmClient`]) produces the next
//! assistant message, and when that message requests tool invocations the tool step runs
//! them and appends one result per invocation. The loop ends when the model answers
//! without tool calls.
//!
//! ## Two drivers, one loop
//!
//! - [`AgentRunner`] compiles the loop into a [`StateGraph`]: `agent` and `tools` nodes,
//!   a conditional edge on [`tools_condition`] and the [`AppendMessages`] reducer.
//! - [`Dispatcher`] runs the same steps as an explicit [`Phase`] state machine.
//!
//! ## Main modules
//!
//! - [`message`]: [`Message`], [`ToolCall`].
//! - [`state`]: [`MessageLog`], [`MessagesState`], [`AppendMessages`].
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`], [`RunConfig`].
//! - [`llm`]: [`LlmClient`], [`MockLlm`], [`ChatOpenAI`].
//! - [`tools`] / [`tool_source`]: [`Tool`], [`ToolRegistry`], [`ToolSource`], [`WeatherTool`].
//! - [`agent`]: [`ModelNode`], [`ToolNode`], [`route`], [`Dispatcher`], [`AgentRunner`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use toolloop::{AgentGraphOptions, AgentRunner, MockLlm, RunConfig, ToolRegistry, WeatherTool};
//!
//! # async fn demo() -> Result<(), toolloop::RunError> {
//! let tools = Arc::new(ToolRegistry::builder().register(WeatherTool::new())?.build());
//! let llm = Arc::new(MockLlm::weather_round_trip("sf"));
//! let runner = AgentRunner::new(llm, tools, AgentGraphOptions::default())?;
//! let state = runner
//!     .invoke("What is the weather in sf", Some(RunConfig::new().with_thread_id("11")))
//!     .await?;
//! println!("{}", state.last_assistant_reply().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod channels;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod state;
pub mod stream;
pub mod tool_source;
pub mod tools;

pub use agent::{
    build_agent_graph, route, tools_condition, AgentGraphOptions, AgentRunner, Dispatcher,
    ModelNode, Phase, Route, RunError, ToolNode,
};
pub use channels::{BoxedStateUpdater, ReplaceUpdater, StateUpdater};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, LoggingNodeMiddleware, Next, Node, NodeMiddleware,
    RunConfig, RunContext, StateGraph, END, START,
};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, MockTurn, ToolChoiceMode};
pub use message::{Message, ToolCall};
pub use state::{AppendMessages, MessageLog, MessagesState};
pub use stream::{StreamEvent, StreamMode};
pub use tool_source::{ToolCallContent, ToolError, ToolSource, ToolSpec};
pub use tools::{FnTool, RegistryError, Tool, ToolRegistry, WeatherTool};
