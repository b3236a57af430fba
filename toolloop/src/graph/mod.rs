//! Minimal state-graph engine: nodes, plain and conditional edges, reducers, middleware.
//!
//! Build a [`StateGraph`], `compile` it into a [`CompiledStateGraph`], then `invoke` or
//! `stream` it with an optional [`RunConfig`].

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod logging_middleware;
mod next;
mod node;
mod node_middleware;
mod run_config;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_route, log_state_update,
};
pub use logging_middleware::LoggingNodeMiddleware;
pub use next::Next;
pub use node::Node;
pub use node_middleware::{NodeMiddleware, NodeRunFn, NodeRunFuture};
pub use run_config::RunConfig;
pub use run_context::RunContext;
pub use state_graph::{StateGraph, DEFAULT_RECURSION_LIMIT, END, START};
