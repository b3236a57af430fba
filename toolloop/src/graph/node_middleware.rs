//! Node middleware: wrap each node run with extra async logic (around pattern).
//!
//! Set via `StateGraph::with_middleware`.

use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use crate::error::AgentError;

use super::Next;

/// Boxed future returned by the wrapped node run.
pub type NodeRunFuture<S> = Pin<Box<dyn Future<Output = Result<(S, Next), AgentError>> + Send>>;

/// The wrapped node run; middleware must call it to execute the node.
pub type NodeRunFn<S> = Box<dyn FnOnce(S) -> NodeRunFuture<S> + Send>;

/// Async middleware around `Node::run_with_context`.
///
/// May call `inner` once, inspect or rewrite its result, or short-circuit with an error.
#[async_trait]
pub trait NodeMiddleware<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S>,
    ) -> Result<(S, Next), AgentError>;
}
