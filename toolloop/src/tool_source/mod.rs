//! Tool source: the seam between tools and their consumers.
//!
//! The model client lists tools to bind them; the tool step calls them by name. Both
//! go through [`ToolSource`], implemented by [`ToolRegistry`](crate::tools::ToolRegistry).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// What a tool advertises to the model: name, description and JSON Schema for arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            input_schema,
        }
    }
}

/// Text produced by a successful tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallContent {
    pub text: String,
}

impl ToolCallContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Tool-level failure. The tool step turns every variant into an error tool-result
/// message; none of them stops the loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("tool execution failed: {0}")]
    Execution(String),
}

/// Lists and calls tools by name.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolError>;

    /// Calls `name` with `arguments`. Implementations validate arguments before running
    /// the handler.
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolCallContent, ToolError>;
}
