//! Graph compilation error.

use thiserror::Error;

/// Error returned by `StateGraph::compile` when the declared structure is not runnable.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// An edge or conditional source names a node that was never added.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The same node id was added twice.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// No edge leaves START.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// Nothing can ever reach END.
    #[error("graph has no path to END")]
    MissingEnd,

    /// Edges branch where they may not (two edges from START, or two plain edges from one node).
    #[error("invalid edges: {0}")]
    InvalidChain(String),

    /// A node has a plain edge to a real node and conditional edges.
    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// A path_map value is neither a node id nor END.
    #[error("conditional path_map invalid target: {0}")]
    InvalidConditionalPathMap(String),
}
