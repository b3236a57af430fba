//! Closure-backed tool: name, description and schema around an async function.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolError, ToolSpec};

use super::Tool;

type Handler = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<String, ToolError>> + Send + Sync>;

/// Tool defined by a function plus its declaration.
///
/// ```rust
/// use serde_json::json;
/// use toolloop::tools::FnTool;
///
/// let echo = FnTool::sync(
///     "echo",
///     "Echo the text back.",
///     json!({"type": "object", "properties": {"text": {"type": "string"}}, "required": ["text"]}),
///     |args| Ok(args["text"].as_str().unwrap_or_default().to_string()),
/// );
/// # let _ = echo;
/// ```
pub struct FnTool {
    spec: ToolSpec,
    handler: Handler,
}

impl FnTool {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        f: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |args: Value| f(args).boxed());
        Self {
            spec: ToolSpec::new(name, description, input_schema),
            handler,
        }
    }

    /// Same as [`FnTool::new`] for a synchronous function.
    pub fn sync<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        f: F,
    ) -> Self
    where
        F: Fn(&Value) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        Self::new(name, description, input_schema, move |args: Value| {
            let out = f(&args);
            async move { out }
        })
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolError> {
        (self.handler)(args).await.map(ToolCallContent::text)
    }
}
