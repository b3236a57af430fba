//! Mock `weather` tool.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool_source::{ToolCallContent, ToolError, ToolSpec};

use super::Tool;

pub const TOOL_WEATHER: &str = "weather";

const FOGGY: &str = "It's 60 degrees and foggy.";
const SUNNY: &str = "It's 90 degrees and sunny.";

/// Canned weather: foggy for San Francisco, sunny everywhere else.
pub fn weather_report(query: &str) -> &'static str {
    let q = query.to_lowercase();
    if q.contains("sf") || q.contains("san francisco") {
        FOGGY
    } else {
        SUNNY
    }
}

/// `weather({"query": string})`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherTool;

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        TOOL_WEATHER
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            TOOL_WEATHER,
            "Call to get the current weather for a location.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The query to use in the search."
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolError> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("missing string 'query'".into()))?;
        tracing::debug!(query, "weather lookup");
        Ok(ToolCallContent::text(weather_report(query)))
    }
}
