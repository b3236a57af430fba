//! Graph node trait: one step in a StateGraph.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::AgentError;

use super::{Next, RunContext};

/// One step in a graph: state in, (update out, next step).
///
/// The returned state is handed to the graph's
/// [`StateUpdater`](crate::channels::StateUpdater); with the default replace updater it
/// is the new full state, with [`AppendMessages`](crate::state::AppendMessages) it only
/// needs to carry the messages the node produced.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node id (e.g. `"agent"`, `"tools"`). Must be unique within a graph.
    fn id(&self) -> &str;

    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;

    /// Variant with run context (config, cancellation, stream sender).
    ///
    /// Default implementation calls `run` and ignores the context.
    async fn run_with_context(
        &self,
        state: S,
        _ctx: &RunContext<S>,
    ) -> Result<(S, Next), AgentError> {
        self.run(state).await
    }
}
