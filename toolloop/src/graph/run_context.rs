//! Run context passed into nodes: config plus the optional stream sender.

use std::collections::HashSet;
use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::RunConfig;

/// Context for one graph run, handed to `Node::run_with_context`.
#[derive(Clone)]
pub struct RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub config: RunConfig,
    /// Set only for `CompiledStateGraph::stream`.
    pub stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
    pub stream_mode: HashSet<StreamMode>,
}

impl<S> RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            stream_tx: None,
            stream_mode: HashSet::new(),
        }
    }

    pub fn with_stream(
        mut self,
        tx: mpsc::Sender<StreamEvent<S>>,
        modes: impl IntoIterator<Item = StreamMode>,
    ) -> Self {
        self.stream_tx = Some(tx);
        self.stream_mode = modes.into_iter().collect();
        self
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.config.thread_id.as_deref()
    }

    pub fn is_streaming(&self, mode: StreamMode) -> bool {
        self.stream_tx.is_some() && self.stream_mode.contains(&mode)
    }

    /// Sends `event` when `mode` is enabled. A dropped receiver is ignored.
    pub async fn emit(&self, mode: StreamMode, event: StreamEvent<S>) {
        if !self.stream_mode.contains(&mode) {
            return;
        }
        if let Some(tx) = &self.stream_tx {
            let _ = tx.send(event).await;
        }
    }

    /// Sends the terminal `StreamEvent::Error`, regardless of the enabled modes.
    pub async fn emit_error(&self, err: &AgentError) {
        if let Some(tx) = &self.stream_tx {
            let _ = tx.send(StreamEvent::Error(err.clone())).await;
        }
    }
}
