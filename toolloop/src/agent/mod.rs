//! The model/tool dispatch loop.
//!
//! Two drivers share the same [`ModelNode`] and [`ToolNode`]:
//! - [`AgentRunner`] runs the compiled agent graph ([`build_agent_graph`]);
//! - [`Dispatcher`] runs the same loop as an explicit [`Phase`] state machine.
//!
//! Both stop when the model replies without tool calls ([`route`] returns `Terminate`).

mod dispatcher;
mod model_node;
mod phase;
mod route;
mod runner;
mod tool_node;

pub use dispatcher::Dispatcher;
pub use model_node::ModelNode;
pub use phase::Phase;
pub use route::{route, tools_condition, Route};
pub use runner::{build_agent_graph, AgentGraphOptions, AgentRunner, RunError};
pub use tool_node::{ToolNode, DEFAULT_EXECUTION_ERROR_TEMPLATE};

/// Node id of the model step.
pub const NODE_AGENT: &str = "agent";

/// Node id of the tool step.
pub const NODE_TOOLS: &str = "tools";
