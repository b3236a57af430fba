//! State updaters: how a node's output is merged into the running graph state.
//!
//! By default the node output replaces the state. Graphs whose nodes return partial
//! updates (e.g. only the newly produced messages) install a merging updater such as
//! [`AppendMessages`](crate::state::AppendMessages) via `StateGraph::with_state_updater`.
//!
//! ```rust,ignore
//! use toolloop::channels::StateUpdater;
//!
//! #[derive(Clone, Debug)]
//! struct Counter { hits: u32 }
//!
//! #[derive(Debug)]
//! struct Sum;
//!
//! impl StateUpdater<Counter> for Sum {
//!     fn apply_update(&self, current: &mut Counter, update: &Counter) {
//!         current.hits += update.hits;
//!     }
//! }
//! ```

use std::fmt::Debug;
use std::sync::Arc;

/// Merges a node's output (`update`) into the current state.
pub trait StateUpdater<S>: Send + Sync + Debug
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn apply_update(&self, current: &mut S, update: &S);
}

/// Default updater: the node's output replaces the whole state.
#[derive(Debug, Clone, Default)]
pub struct ReplaceUpdater;

impl<S> StateUpdater<S> for ReplaceUpdater
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn apply_update(&self, current: &mut S, update: &S) {
        *current = update.clone();
    }
}

/// Shared, type-erased updater as stored by the graph.
pub type BoxedStateUpdater<S> = Arc<dyn StateUpdater<S>>;
