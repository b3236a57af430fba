use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolError, ToolSpec};

/// A callable tool registered in a [`ToolRegistry`](super::ToolRegistry).
///
/// `call` receives arguments that already passed validation against `spec().input_schema`
/// when invoked through the registry.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolError>;
}
