//! Compile-time validation.

use std::sync::Arc;

use toolloop::{CompilationError, StateGraph, END, START};

use crate::common::{StepNode, Trace};

#[test]
fn missing_start_edge() {
    let mut graph = StateGraph::<Trace>::new();
    graph.add_node("a", StepNode::new("a")).add_edge("a", END);
    assert!(matches!(graph.compile(), Err(CompilationError::MissingStart)));
}

#[test]
fn two_start_edges() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", StepNode::new("a"))
        .add_node("b", StepNode::new("b"))
        .add_edge(START, "a")
        .add_edge(START, "b")
        .add_edge("a", END)
        .add_edge("b", END);
    assert!(matches!(graph.compile(), Err(CompilationError::InvalidChain(_))));
}

#[test]
fn no_path_to_end() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", StepNode::new("a"))
        .add_node("b", StepNode::new("b"))
        .add_edge(START, "a")
        .add_edge("a", "b");
    assert!(matches!(graph.compile(), Err(CompilationError::MissingEnd)));
}

#[test]
fn edge_to_unknown_node() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", StepNode::new("a"))
        .add_edge(START, "a")
        .add_edge("a", "ghost")
        .add_edge("ghost", END);
    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "ghost"),
        Err(e) => panic!("expected NodeNotFound(ghost), got {:?}", e),
        Ok(_) => panic!("expected compile error"),
    }
}

#[test]
fn conditional_source_must_exist() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", StepNode::new("a"))
        .add_edge(START, "a")
        .add_edge("a", END)
        .add_conditional_edges("ghost", Arc::new(|_: &Trace| END.to_string()), None);
    assert!(matches!(graph.compile(), Err(CompilationError::NodeNotFound(id)) if id == "ghost"));
}

/// **Scenario**: `agent → END` next to conditional edges on `agent` is a no-op, any
/// other plain edge there is rejected.
#[test]
fn end_edge_beside_router_is_dropped_other_edges_rejected() {
    let build = |extra_target: &str| {
        let mut graph = StateGraph::<Trace>::new();
        graph
            .add_node("agent", StepNode::new("agent"))
            .add_node("tools", StepNode::new("tools"))
            .add_edge(START, "agent")
            .add_conditional_edges("agent", Arc::new(|_: &Trace| END.to_string()), None)
            .add_edge("tools", "agent")
            .add_edge("agent", extra_target);
        graph.compile()
    };
    assert!(build(END).is_ok());
    assert!(matches!(
        build("tools"),
        Err(CompilationError::NodeHasBothEdgeAndConditional(id)) if id == "agent"
    ));
}
