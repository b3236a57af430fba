//! Shared state and nodes for the StateGraph tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use toolloop::graph::{NodeMiddleware, NodeRunFn};
use toolloop::{AgentError, Next, Node};

/// Records which nodes ran, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    pub visited: Vec<String>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.visited.len()
    }
}

/// Appends its id to the trace and returns the configured `Next`.
pub struct StepNode {
    id: &'static str,
    next: Next,
}

impl StepNode {
    pub fn new(id: &'static str) -> Arc<Self> {
        Arc::new(Self {
            id,
            next: Next::Continue,
        })
    }

    pub fn jumping(id: &'static str, next: Next) -> Arc<Self> {
        Arc::new(Self { id, next })
    }
}

#[async_trait]
impl Node<Trace> for StepNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, mut state: Trace) -> Result<(Trace, Next), AgentError> {
        state.visited.push(self.id.to_string());
        Ok((state, self.next.clone()))
    }
}

/// Always fails.
pub struct FailingNode;

#[async_trait]
impl Node<Trace> for FailingNode {
    fn id(&self) -> &str {
        "failing"
    }

    async fn run(&self, _state: Trace) -> Result<(Trace, Next), AgentError> {
        Err(AgentError::ExecutionFailed("always fails".into()))
    }
}

/// Counts node runs that pass through it.
#[derive(Default)]
pub struct CountingMiddleware {
    pub runs: AtomicUsize,
}

impl CountingMiddleware {
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeMiddleware<Trace> for CountingMiddleware {
    async fn around_run(
        &self,
        _node_id: &str,
        state: Trace,
        inner: NodeRunFn<Trace>,
    ) -> Result<(Trace, Next), AgentError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        inner(state).await
    }
}
