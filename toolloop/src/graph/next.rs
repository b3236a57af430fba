//! Next-step result from a graph node: follow the plain edge, jump to a node, or end.

/// Next step after running a node.
///
/// - **Continue**: follow the node's plain outgoing edge (END if it has none).
/// - **Node(id)**: run the given node next.
/// - **End**: stop and return the current state.
///
/// Ignored for nodes with conditional edges: the router decides there.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    Continue,
    Node(String),
    End,
}
