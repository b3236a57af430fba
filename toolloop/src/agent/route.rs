//! Routing decision after a model turn: invoke tools or terminate.

use crate::graph::END;
use crate::message::Message;
use crate::state::MessagesState;

use super::NODE_TOOLS;

/// Where the loop goes after the model answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The last message requests one or more tool invocations.
    InvokeTool,
    /// Anything else, including an empty log or a last message that is not from the assistant.
    Terminate,
}

impl Route {
    /// Graph key: the tools node id or END.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvokeTool => NODE_TOOLS,
            Self::Terminate => END,
        }
    }
}

/// Inspects only the last message.
pub fn route(messages: &[Message]) -> Route {
    match messages.last() {
        Some(last) if last.has_tool_calls() => Route::InvokeTool,
        _ => Route::Terminate,
    }
}

/// Conditional-edge router for the agent graph.
pub fn tools_condition(state: &MessagesState) -> String {
    route(state.messages.as_slice()).as_str().to_string()
}
