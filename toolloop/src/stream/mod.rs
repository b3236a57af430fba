//! Streaming events emitted by `CompiledStateGraph::stream`.

use std::fmt::Debug;

use crate::error::AgentError;

/// Which events a stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Full state after every node.
    Values,
    /// Each node's update before merging.
    Updates,
    /// Node start/end markers.
    Tasks,
}

/// One streamed event.
#[derive(Debug, Clone)]
pub enum StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    Values(S),
    Updates { node_id: String, update: S },
    TaskStart { node_id: String },
    /// `result` is `Err(message)` when the node failed; the stream ends after it.
    TaskEnd {
        node_id: String,
        result: Result<(), String>,
    },
    /// The run failed (node error, recursion limit or cancellation). Always sent,
    /// whatever the selected modes, and always the last event.
    Error(AgentError),
}

impl<S> StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node the event belongs to; `None` for `Values` and `Error`.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::Values(_) | Self::Error(_) => None,
            Self::Updates { node_id, .. }
            | Self::TaskStart { node_id }
            | Self::TaskEnd { node_id, .. } => Some(node_id),
        }
    }
}
