//! Conditional edges: choose the next node from the state after a node runs.
//!
//! A router maps the state to a key; the key is looked up in an optional path map,
//! falling back to the key itself as the node id (or END).

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Router function: state → routing key.
pub type ConditionalRouterFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Router plus optional key → node id map.
#[derive(Clone)]
pub struct ConditionalRouter<S> {
    pub(super) path: ConditionalRouterFn<S>,
    pub(super) path_map: Option<HashMap<String, String>>,
}

impl<S> ConditionalRouter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(path: ConditionalRouterFn<S>, path_map: Option<HashMap<String, String>>) -> Self {
        Self { path, path_map }
    }

    /// Node id (or END) to run after the source node, given the merged state.
    pub fn resolve_next(&self, state: &S) -> String {
        let key = (self.path)(state);
        self.path_map
            .as_ref()
            .and_then(|m| m.get(&key))
            .cloned()
            .unwrap_or(key)
    }
}

/// How the compiled graph picks the node after a given node.
#[derive(Clone)]
pub enum NextEntry<S> {
    /// Fixed successor (or END); the node's own `Next` may still override it.
    Unconditional(String),
    /// Successor chosen by the router; the node's `Next` is ignored.
    Conditional(ConditionalRouter<S>),
}
