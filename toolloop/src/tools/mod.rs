//! Tools: the [`Tool`] trait, the [`ToolRegistry`], argument validation and the
//! built-in `weather` tool.

mod fn_tool;
mod registry;
mod schema;
mod r#trait;
mod weather;

pub use fn_tool::FnTool;
pub use r#trait::Tool;
pub use registry::{RegistryError, ToolRegistry, ToolRegistryBuilder};
pub use schema::validate_arguments;
pub use weather::{weather_report, WeatherTool, TOOL_WEATHER};
