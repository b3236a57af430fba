//! Running compiled graphs: plain chains, jumps, routers, limits, failures, middleware.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use toolloop::graph::DEFAULT_RECURSION_LIMIT;
use toolloop::{AgentError, Next, RunConfig, StateGraph, END, START};

use crate::common::{CountingMiddleware, FailingNode, StepNode, Trace};

#[tokio::test]
async fn linear_chain_runs_in_edge_order() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", StepNode::new("a"))
        .add_node("b", StepNode::new("b"))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let out = graph.compile().unwrap().invoke(Trace::default(), None).await.unwrap();
    assert_eq!(out.visited, vec!["a", "b"]);
}

#[tokio::test]
async fn node_next_overrides_plain_edge() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", StepNode::jumping("a", Next::Node("c".into())))
        .add_node("b", StepNode::new("b"))
        .add_node("c", StepNode::jumping("c", Next::End))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", "c")
        .add_edge("c", END);
    let out = graph.compile().unwrap().invoke(Trace::default(), None).await.unwrap();
    assert_eq!(out.visited, vec!["a", "c"]);
}

/// **Scenario**: a router loops `work → check → work` until the trace is long enough.
#[tokio::test]
async fn conditional_router_loops_until_end() {
    let path_map: HashMap<String, String> = [
        ("again".to_string(), "work".to_string()),
        ("done".to_string(), END.to_string()),
    ]
    .into_iter()
    .collect();
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("work", StepNode::new("work"))
        .add_node("check", StepNode::new("check"))
        .add_edge(START, "work")
        .add_edge("work", "check")
        .add_conditional_edges(
            "check",
            Arc::new(|s: &Trace| if s.len() < 6 { "again".to_string() } else { "done".to_string() }),
            Some(path_map),
        );
    let out = graph.compile().unwrap().invoke(Trace::default(), None).await.unwrap();
    assert_eq!(out.visited, vec!["work", "check", "work", "check", "work", "check"]);
}

fn endless_graph() -> StateGraph<Trace> {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("spin", StepNode::new("spin"))
        .add_edge(START, "spin")
        .add_conditional_edges(
            "spin",
            Arc::new(|s: &Trace| if s.len() > 1000 { END.to_string() } else { "spin".to_string() }),
            None,
        );
    graph
}

#[tokio::test]
async fn recursion_limit_defaults_to_25() {
    let compiled = endless_graph().compile().unwrap();
    assert_eq!(compiled.recursion_limit(), DEFAULT_RECURSION_LIMIT);
    let err = compiled.invoke(Trace::default(), None).await.unwrap_err();
    assert!(matches!(err, AgentError::RecursionLimit(25)));
}

#[tokio::test]
async fn recursion_limit_from_builder_and_run_config() {
    let compiled = endless_graph().with_recursion_limit(3).compile().unwrap();
    assert!(matches!(
        compiled.invoke(Trace::default(), None).await,
        Err(AgentError::RecursionLimit(3))
    ));
    assert!(matches!(
        compiled
            .invoke(Trace::default(), Some(RunConfig::new().with_recursion_limit(7)))
            .await,
        Err(AgentError::RecursionLimit(7))
    ));
}

#[tokio::test]
async fn node_error_propagates() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("failing", Arc::new(FailingNode))
        .add_edge(START, "failing")
        .add_edge("failing", END);
    let err = graph.compile().unwrap().invoke(Trace::default(), None).await.unwrap_err();
    assert!(matches!(err, AgentError::ExecutionFailed(ref m) if m == "always fails"));
}

#[tokio::test]
async fn cancelled_run_stops_before_first_node() {
    let token = CancellationToken::new();
    token.cancel();
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", StepNode::new("a"))
        .add_edge(START, "a")
        .add_edge("a", END);
    let err = graph
        .compile()
        .unwrap()
        .invoke(Trace::default(), Some(RunConfig::new().with_cancellation(token)))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::Cancelled));
}

#[tokio::test]
async fn middleware_wraps_every_node_run() {
    let middleware = Arc::new(CountingMiddleware::default());
    let mut graph = StateGraph::<Trace>::new().with_middleware(middleware.clone());
    graph
        .add_node("a", StepNode::new("a"))
        .add_node("b", StepNode::new("b"))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let out = graph.compile().unwrap().invoke(Trace::default(), None).await.unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(middleware.runs(), 2);
}
