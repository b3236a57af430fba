//! Middleware that logs node enter/exit with timings.

use async_trait::async_trait;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Instant;

use crate::error::AgentError;

use super::{Next, NodeMiddleware, NodeRunFn};

/// Logs `enter` / `exit` for every node run at `info`, failures at `warn`.
///
/// The weather-agent binary installs it with `--verbose`. Only the node id, the next
/// step and the elapsed time are logged; state is left to `graph::logging` at `debug`.
pub struct LoggingNodeMiddleware<S> {
    _phantom: PhantomData<fn(S)>,
}

impl<S> LoggingNodeMiddleware<S> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<S> Default for LoggingNodeMiddleware<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> NodeMiddleware<S> for LoggingNodeMiddleware<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S>,
    ) -> Result<(S, Next), AgentError> {
        tracing::info!(node_id, "enter node");
        let started = Instant::now();
        let result = inner(state).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok((_, next)) => tracing::info!(node_id, ?next, elapsed_ms, "exit node"),
            Err(error) => tracing::warn!(node_id, %error, elapsed_ms, "node failed"),
        }
        result
    }
}
