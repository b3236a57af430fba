//! State graph: nodes, plain edges (from → to) and conditional edges.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` using `START` and
//! `END` for entry and exit, route on state with `add_conditional_edges`, then `compile`.
//!
//! # Conditional edges
//!
//! After a source node runs, its router is called with the merged state; the returned key
//! is the next node id, or is looked up in the optional path map. A node with conditional
//! edges may not also have a plain edge to another node. A plain edge from that node to
//! `END` adds nothing the router cannot already express, so `compile` drops it.
//!
//! # State updates
//!
//! By default a node's output replaces the state. Use `with_state_updater` (for example
//! with [`AppendMessages`](crate::state::AppendMessages)) to merge partial updates.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::channels::{BoxedStateUpdater, ReplaceUpdater};

use super::compile_error::CompilationError;
use super::compiled::CompiledStateGraph;
use super::conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
use super::node::Node;
use super::node_middleware::NodeMiddleware;

/// Sentinel for graph entry: `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: `add_edge(last_node_id, END)`, or a router key.
pub const END: &str = "__end__";

/// Super-steps a run may take before failing with `AgentError::RecursionLimit`.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Graph builder, generic over the state type `S`.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    duplicate_nodes: Vec<String>,
    edges: Vec<(String, String)>,
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    state_updater: Option<BoxedStateUpdater<S>>,
    recursion_limit: usize,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            duplicate_nodes: Vec::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
            middleware: None,
            state_updater: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Wraps every node run in `middleware`.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Sets how node outputs are merged into the state (default: replace).
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use toolloop::graph::StateGraph;
    /// use toolloop::state::{AppendMessages, MessagesState};
    ///
    /// let graph = StateGraph::<MessagesState>::new().with_state_updater(Arc::new(AppendMessages));
    /// # let _ = graph;
    /// ```
    pub fn with_state_updater(self, updater: BoxedStateUpdater<S>) -> Self {
        Self {
            state_updater: Some(updater),
            ..self
        }
    }

    pub fn with_recursion_limit(self, limit: usize) -> Self {
        Self {
            recursion_limit: limit,
            ..self
        }
    }

    /// Adds a node. Ids must be unique; a repeated id fails `compile` with `DuplicateNode`.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        let id = id.into();
        if self.nodes.insert(id.clone(), node).is_some() {
            self.duplicate_nodes.push(id);
        }
        self
    }

    /// Adds a plain edge. Both ids (except START/END) must be added before `compile`.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Routes out of `source` by `path(state)`.
    ///
    /// - `path_map == None`: the key returned by `path` is the next node id (or END).
    /// - `path_map == Some(map)`: the key is looked up in `map`; a missing key is used as is.
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        path: ConditionalRouterFn<S>,
        path_map: Option<HashMap<String, String>>,
    ) -> &mut Self {
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(path, path_map));
        self
    }

    /// Validates the structure and builds the executable graph.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        if let Some(id) = self.duplicate_nodes.first() {
            return Err(CompilationError::DuplicateNode(id.clone()));
        }
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }
        for (source, router) in &self.conditional_edges {
            if !self.nodes.contains_key(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            if let Some(path_map) = &router.path_map {
                if let Some(bad) = path_map
                    .values()
                    .find(|t| t.as_str() != END && !self.nodes.contains_key(t.as_str()))
                {
                    return Err(CompilationError::InvalidConditionalPathMap(bad.clone()));
                }
            }
        }

        let mut start_targets = self.edges.iter().filter(|(f, _)| f == START).map(|(_, t)| t);
        let first = match (start_targets.next(), start_targets.next()) {
            (None, _) => return Err(CompilationError::MissingStart),
            (Some(t), None) => t.clone(),
            (Some(_), Some(_)) => {
                return Err(CompilationError::InvalidChain(
                    "multiple edges from START".into(),
                ))
            }
        };

        let has_end = self.edges.iter().any(|(_, t)| t == END)
            || self.conditional_edges.values().any(|r| {
                r.path_map
                    .as_ref()
                    .map_or(true, |m| m.values().any(|v| v == END))
            });
        if !has_end {
            return Err(CompilationError::MissingEnd);
        }

        let mut plain: Vec<(String, String)> = Vec::new();
        let mut seen_from = HashSet::new();
        for (from, to) in self.edges.into_iter().filter(|(f, _)| f != START) {
            if self.conditional_edges.contains_key(&from) {
                if to == END {
                    tracing::debug!(node_id = %from, "edge to END next to conditional edges ignored");
                    continue;
                }
                return Err(CompilationError::NodeHasBothEdgeAndConditional(from));
            }
            if !seen_from.insert(from.clone()) {
                return Err(CompilationError::InvalidChain(format!(
                    "more than one edge from {}",
                    from
                )));
            }
            plain.push((from, to));
        }

        let mut next_map: HashMap<String, NextEntry<S>> = plain
            .into_iter()
            .map(|(f, t)| (f, NextEntry::Unconditional(t)))
            .collect();
        for (source, router) in self.conditional_edges {
            next_map.insert(source, NextEntry::Conditional(router));
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            first_node_id: first,
            next_map,
            middleware: self.middleware,
            state_updater: self
                .state_updater
                .unwrap_or_else(|| Arc::new(ReplaceUpdater)),
            recursion_limit: self.recursion_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;
    use crate::graph::Next;
    use async_trait::async_trait;

    #[derive(Clone, Debug)]
    struct Dummy;

    struct DummyNode(&'static str);

    #[async_trait]
    impl Node<Dummy> for DummyNode {
        fn id(&self) -> &str {
            self.0
        }
        async fn run(&self, state: Dummy) -> Result<(Dummy, Next), AgentError> {
            Ok((state, Next::Continue))
        }
    }

    fn router_to_end() -> ConditionalRouterFn<Dummy> {
        Arc::new(|_| END.to_string())
    }

    /// **Scenario**: a plain edge to END next to conditional edges compiles and is dropped.
    #[test]
    fn end_edge_next_to_conditional_is_a_no_op() {
        let mut graph = StateGraph::<Dummy>::new();
        graph.add_node("agent", Arc::new(DummyNode("agent")));
        graph.add_edge(START, "agent");
        graph.add_conditional_edges("agent", router_to_end(), None);
        graph.add_edge("agent", END);
        let compiled = graph.compile().expect("compiles");
        assert!(matches!(
            compiled.next_map.get("agent"),
            Some(NextEntry::Conditional(_))
        ));
    }

    #[test]
    fn compile_fails_when_node_has_both_edge_and_conditional() {
        let mut graph = StateGraph::<Dummy>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_node("b", Arc::new(DummyNode("b")));
        graph.add_edge(START, "a");
        graph.add_edge("a", "b");
        graph.add_edge("b", END);
        graph.add_conditional_edges("a", Arc::new(|_| "b".to_string()), None);
        match graph.compile() {
            Err(CompilationError::NodeHasBothEdgeAndConditional(id)) => assert_eq!(id, "a"),
            Err(e) => panic!("expected NodeHasBothEdgeAndConditional(a), got {:?}", e),
            Ok(_) => panic!("expected compile error"),
        }
    }

    #[test]
    fn compile_fails_on_invalid_path_map_target() {
        let mut graph = StateGraph::<Dummy>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_edge(START, "a");
        graph.add_conditional_edges(
            "a",
            Arc::new(|_| "x".to_string()),
            Some([("x".to_string(), "nonexistent".to_string())].into_iter().collect()),
        );
        match graph.compile() {
            Err(CompilationError::InvalidConditionalPathMap(id)) => assert_eq!(id, "nonexistent"),
            Err(e) => panic!("expected InvalidConditionalPathMap, got {:?}", e),
            Ok(_) => panic!("expected compile error"),
        }
    }

    #[test]
    fn compile_fails_on_duplicate_node_id() {
        let mut graph = StateGraph::<Dummy>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_edge(START, "a");
        graph.add_edge("a", END);
        assert!(matches!(graph.compile(), Err(CompilationError::DuplicateNode(id)) if id == "a"));
    }

    #[test]
    fn compile_fails_on_two_plain_edges_from_one_node() {
        let mut graph = StateGraph::<Dummy>::new();
        graph.add_node("a", Arc::new(DummyNode("a")));
        graph.add_node("b", Arc::new(DummyNode("b")));
        graph.add_edge(START, "a");
        graph.add_edge("a", "b");
        graph.add_edge("a", END);
        graph.add_edge("b", END);
        assert!(matches!(graph.compile(), Err(CompilationError::InvalidChain(_))));
    }
}
