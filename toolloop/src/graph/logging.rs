//! Structured `tracing` events for graph runs.
//!
//! Node-level events are `debug`, run start/complete are `info`, run failures are `error`.
//! Every event carries the thread id when the caller set one.

use std::fmt::Debug;

use crate::error::AgentError;

use super::Next;

pub fn log_graph_start(thread_id: Option<&str>, first_node: &str) {
    tracing::info!(thread_id = thread_id, first_node, "graph run started");
}

pub fn log_graph_complete(thread_id: Option<&str>, steps: usize) {
    tracing::info!(thread_id = thread_id, steps, "graph run complete");
}

pub fn log_graph_error(thread_id: Option<&str>, error: &AgentError) {
    tracing::error!(thread_id = thread_id, %error, "graph run failed");
}

pub fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id, step, "node started");
}

/// Input state for the node about to run.
pub fn log_node_state<S: Debug>(node_id: &str, state: &S) {
    tracing::debug!(node_id, state = ?state, "node input state");
}

pub fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node_id, ?next, "node complete");
}

pub fn log_state_update(node_id: &str) {
    tracing::debug!(node_id, "state merged");
}

pub fn log_route(from: &str, to: &str) {
    tracing::debug!(from, to, "routed");
}
