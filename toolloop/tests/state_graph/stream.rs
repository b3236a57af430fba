//! Streaming runs: values, updates and task events.

use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use toolloop::{AgentError, RunConfig, StateGraph, StreamEvent, StreamMode, END, START};

use crate::common::{FailingNode, StepNode, Trace};

fn chain() -> StateGraph<Trace> {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", StepNode::new("a"))
        .add_node("b", StepNode::new("b"))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    graph
}

#[tokio::test]
async fn last_values_event_equals_invoke_result() {
    let compiled = chain().compile().unwrap();
    let expected = compiled.invoke(Trace::default(), None).await.unwrap();

    let events: Vec<_> = compiled
        .stream(Trace::default(), None, [StreamMode::Values])
        .collect()
        .await;
    assert_eq!(events.len(), 2);
    match events.last() {
        Some(StreamEvent::Values(state)) => assert_eq!(state, &expected),
        other => panic!("expected Values, got {:?}", other),
    }
}

#[tokio::test]
async fn task_and_update_events_per_node() {
    let compiled = chain().compile().unwrap();
    let events: Vec<_> = compiled
        .stream(Trace::default(), None, [StreamMode::Tasks, StreamMode::Updates])
        .collect()
        .await;
    let kinds: Vec<String> = events
        .iter()
        .map(|e| match e {
            StreamEvent::TaskStart { node_id } => format!("start:{}", node_id),
            StreamEvent::TaskEnd { node_id, result } => format!("end:{}:{}", node_id, result.is_ok()),
            StreamEvent::Updates { node_id, .. } => format!("update:{}", node_id),
            StreamEvent::Values(_) => "values".to_string(),
            StreamEvent::Error(err) => format!("error:{}", err),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "start:a", "end:a:true", "update:a", "start:b", "end:b:true", "update:b"
        ]
    );
}

#[tokio::test]
async fn failing_node_ends_stream_with_error_task_end() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("failing", std::sync::Arc::new(FailingNode))
        .add_edge(START, "failing")
        .add_edge("failing", END);
    let events: Vec<_> = graph
        .compile()
        .unwrap()
        .stream(Trace::default(), None, [StreamMode::Tasks, StreamMode::Values])
        .collect()
        .await;
    assert_eq!(events.len(), 3);
    assert!(matches!(
        &events[1],
        StreamEvent::TaskEnd { node_id, result: Err(m) } if node_id == "failing" && m.contains("always fails")
    ));
    assert!(matches!(&events[2], StreamEvent::Error(AgentError::ExecutionFailed(m)) if m.contains("always fails")));
}

/// **Scenario**: hitting the recursion limit between nodes ends the stream with the same
/// error `invoke` returns, even when only `Values` are selected.
#[tokio::test]
async fn recursion_limit_ends_stream_with_error() {
    let compiled = chain().compile().unwrap();
    let config = RunConfig::new().with_recursion_limit(1);
    let invoke_err = compiled
        .invoke(Trace::default(), Some(config.clone()))
        .await
        .unwrap_err();
    assert!(matches!(invoke_err, AgentError::RecursionLimit(1)));

    let events: Vec<_> = compiled
        .stream(Trace::default(), Some(config), [StreamMode::Values])
        .collect()
        .await;
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], StreamEvent::Values(_)));
    assert!(matches!(&events[1], StreamEvent::Error(AgentError::RecursionLimit(1))));
}

#[tokio::test]
async fn cancelled_before_first_node_streams_only_the_error() {
    let token = CancellationToken::new();
    token.cancel();
    let events: Vec<_> = chain()
        .compile()
        .unwrap()
        .stream(
            Trace::default(),
            Some(RunConfig::new().with_cancellation(token)),
            [StreamMode::Values, StreamMode::Tasks],
        )
        .collect()
        .await;
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], StreamEvent::Error(AgentError::Cancelled)));
}
