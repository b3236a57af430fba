//! Run-level error types.
//!
//! Returned by nodes, the compiled graph and the dispatcher. Tool failures are not
//! represented here: they are turned into error tool-result messages by the tool step
//! (see [`ToolError`](crate::tool_source::ToolError)).

use thiserror::Error;

/// Error that halts a run.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// The reasoning step (model client) failed; not recoverable inside the loop.
    #[error("reasoning step failed: {0}")]
    ReasoningStep(String),

    /// A step was asked to run on a conversation with no messages.
    #[error("conversation state is empty")]
    EmptyState,

    /// The caller cancelled the run while a model or tool call was pending.
    #[error("run cancelled")]
    Cancelled,

    /// The graph ran this many steps without reaching END.
    #[error("recursion limit of {0} steps reached without reaching END")]
    RecursionLimit(usize),

    /// Execution failed with a message (e.g. empty graph, unknown node at runtime).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}
