//! Name → tool registry, built once and shared read-only.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::tool_source::{ToolCallContent, ToolError, ToolSource, ToolSpec};

use super::schema::validate_arguments;
use super::Tool;

/// Registration failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool name must not be empty")]
    EmptyName,
    #[error("tool already registered: {0}")]
    DuplicateName(String),
}

/// Immutable registry of tools, in registration order.
///
/// Built with [`ToolRegistry::builder`]; implements [`ToolSource`] so the model client
/// and the tool node see the same tools. `call_tool` validates arguments against the
/// tool's schema before running it.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

/// Collects tools and checks names as they are added.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    inner: ToolRegistry,
}

impl ToolRegistryBuilder {
    pub fn register(self, tool: impl Tool + 'static) -> Result<Self, RegistryError> {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(mut self, tool: Arc<dyn Tool>) -> Result<Self, RegistryError> {
        let name = tool.name().to_string();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.inner.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.inner.by_name.insert(name, self.inner.tools.len());
        self.inner.tools.push(tool);
        Ok(self)
    }

    pub fn build(self) -> ToolRegistry {
        self.inner
    }
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }
}

#[async_trait]
impl ToolSource for ToolRegistry {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolError> {
        Ok(self.specs())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolCallContent, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        validate_arguments(&tool.spec().input_schema, &arguments)?;
        tool.call(arguments).await
    }
}
