//! Per-run configuration: thread id, recursion limit override and cancellation.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::AgentError;

/// Config for one `invoke` / `stream` / `Dispatcher::run` call.
///
/// `thread_id` only labels log events; nothing is persisted under it.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub thread_id: Option<String>,
    /// Overrides the graph's recursion limit for this run.
    pub recursion_limit: Option<usize>,
    /// Fires to abort pending model and tool calls.
    pub cancel: CancellationToken,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = Some(limit);
        self
    }

    /// Uses the given token; cancel it (or a parent token) to abort the run.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Awaits `fut` unless the run is cancelled first.
    pub async fn guard<T, F>(&self, fut: F) -> Result<T, AgentError>
    where
        F: Future<Output = Result<T, AgentError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AgentError::Cancelled),
            out = fut => out,
        }
    }
}
