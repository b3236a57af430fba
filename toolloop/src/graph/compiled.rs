//! Executable graph produced by `StateGraph::compile`.
//!
//! One run walks from the START target: run the node (through middleware), merge its
//! update with the state updater, pick the next node, repeat until END. Each node run is a
//! super-step counted against the recursion limit.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::channels::BoxedStateUpdater;
use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::conditional::NextEntry;
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_route, log_state_update,
};
use super::node::Node;
use super::node_middleware::NodeMiddleware;
use super::state_graph::END;
use super::{Next, RunConfig, RunContext};

const STREAM_BUFFER: usize = 128;

/// Compiled graph: immutable, cheap to clone, safe to run concurrently.
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    pub(super) state_updater: BoxedStateUpdater<S>,
    pub(super) recursion_limit: usize,
}

impl<S: Clone> Clone for CompiledStateGraph<S> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            first_node_id: self.first_node_id.clone(),
            next_map: self.next_map.clone(),
            middleware: self.middleware.clone(),
            state_updater: self.state_updater.clone(),
            recursion_limit: self.recursion_limit,
        }
    }
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node that receives the initial state.
    pub fn first_node_id(&self) -> &str {
        &self.first_node_id
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Runs the graph to END and returns the final state.
    pub async fn invoke(&self, state: S, config: Option<RunConfig>) -> Result<S, AgentError> {
        let ctx = RunContext::new(config.unwrap_or_default());
        self.run_loop(state, &ctx).await
    }

    /// Runs the graph in a background task, streaming the selected events.
    ///
    /// The stream ends when the run completes or fails. A failure of any kind (node error,
    /// recursion limit, cancellation) ends it with `StreamEvent::Error`; a failing node is
    /// also reported as a `TaskEnd` with `Err` under `StreamMode::Tasks`. On success with
    /// `StreamMode::Values` the last event is the final state.
    pub fn stream(
        &self,
        state: S,
        config: Option<RunConfig>,
        modes: impl IntoIterator<Item = StreamMode>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let ctx = RunContext::new(config.unwrap_or_default()).with_stream(tx, modes);
        let graph = self.clone();
        tokio::spawn(async move {
            let _ = graph.run_loop(state, &ctx).await;
        });
        ReceiverStream::new(rx)
    }

    async fn run_loop(&self, state: S, ctx: &RunContext<S>) -> Result<S, AgentError> {
        let thread_id = ctx.thread_id();
        log_graph_start(thread_id, &self.first_node_id);
        match self.run_steps(state, ctx).await {
            Ok((state, steps)) => {
                log_graph_complete(thread_id, steps);
                Ok(state)
            }
            Err(err) => {
                log_graph_error(thread_id, &err);
                ctx.emit_error(&err).await;
                Err(err)
            }
        }
    }

    async fn run_steps(&self, mut state: S, ctx: &RunContext<S>) -> Result<(S, usize), AgentError> {
        let limit = ctx.config.recursion_limit.unwrap_or(self.recursion_limit);

        let mut current = self.first_node_id.clone();
        let mut steps = 0usize;
        loop {
            if steps >= limit {
                return Err(AgentError::RecursionLimit(limit));
            }
            if ctx.config.is_cancelled() {
                return Err(AgentError::Cancelled);
            }
            steps += 1;

            let node = self.nodes.get(&current).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("node not found at runtime: {}", current))
            })?;
            log_node_start(&current, steps);
            log_node_state(&current, &state);
            ctx.emit(
                StreamMode::Tasks,
                StreamEvent::TaskStart {
                    node_id: current.clone(),
                },
            )
            .await;

            let (update, next) = match self.execute_node(node, state.clone(), ctx).await {
                Ok(out) => out,
                Err(err) => {
                    ctx.emit(
                        StreamMode::Tasks,
                        StreamEvent::TaskEnd {
                            node_id: current.clone(),
                            result: Err(err.to_string()),
                        },
                    )
                    .await;
                    return Err(err);
                }
            };
            log_node_complete(&current, &next);
            ctx.emit(
                StreamMode::Tasks,
                StreamEvent::TaskEnd {
                    node_id: current.clone(),
                    result: Ok(()),
                },
            )
            .await;

            self.state_updater.apply_update(&mut state, &update);
            log_state_update(&current);
            if ctx.is_streaming(StreamMode::Updates) {
                ctx.emit(
                    StreamMode::Updates,
                    StreamEvent::Updates {
                        node_id: current.clone(),
                        update,
                    },
                )
                .await;
            }
            if ctx.is_streaming(StreamMode::Values) {
                ctx.emit(StreamMode::Values, StreamEvent::Values(state.clone()))
                    .await;
            }

            let target = self.resolve_next(&current, &state, next);
            log_route(&current, &target);
            if target == END {
                break;
            }
            current = target;
        }

        Ok((state, steps))
    }

    /// Router first, then the node's own `Next`, then the plain edge; no edge means END.
    fn resolve_next(&self, current: &str, state: &S, next: Next) -> String {
        match self.next_map.get(current) {
            Some(NextEntry::Conditional(router)) => router.resolve_next(state),
            entry => match next {
                Next::End => END.to_string(),
                Next::Node(id) => id,
                Next::Continue => match entry {
                    Some(NextEntry::Unconditional(to)) => to.clone(),
                    _ => END.to_string(),
                },
            },
        }
    }

    async fn execute_node(
        &self,
        node: Arc<dyn Node<S>>,
        state: S,
        ctx: &RunContext<S>,
    ) -> Result<(S, Next), AgentError> {
        match &self.middleware {
            Some(middleware) => {
                let node_id = node.id().to_string();
                let ctx = ctx.clone();
                middleware
                    .around_run(
                        &node_id,
                        state,
                        Box::new(move |s| {
                            Box::pin(async move { node.run_with_context(s, &ctx).await })
                        }),
                    )
                    .await
            }
            None => node.run_with_context(state, ctx).await,
        }
    }
}
