//! OpenAI-compatible chat completions client (OpenAI, Groq, or any compatible base URL).
//!
//! Assistant tool calls and tool results are sent in the native tool-calling shapes,
//! so the model sees its own earlier calls and their results on the next turn.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, trace};

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage, ChatCompletionTool,
        ChatCompletionToolChoiceOption, ChatCompletionTools, CreateChatCompletionRequestArgs,
        FunctionObject, ToolChoiceOptions,
    },
    Client,
};

use crate::error::AgentError;
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

use super::{LlmClient, LlmResponse, LlmUsage, ToolChoiceMode};

/// Groq's OpenAI-compatible endpoint.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Environment variable holding the Groq API key.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

const OPENAI_DEFAULT_BASE: &str = "https://api.openai.com/v1";
const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Value of `name`, or `None` when it is unset or blank.
fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Chat completions client implementing [`LlmClient`].
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    api_base: String,
    model: String,
    tools: Option<Vec<ToolSpec>>,
    temperature: Option<f32>,
    tool_choice: Option<ToolChoiceMode>,
}

impl ChatOpenAI {
    /// Default OpenAI config (`OPENAI_API_KEY`, `OPENAI_BASE_URL` when set).
    pub fn new(model: impl Into<String>) -> Self {
        let api_base =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| OPENAI_DEFAULT_BASE.to_string());
        let mut config = OpenAIConfig::new().with_api_base(api_base);
        if let Some(key) = env_key(OPENAI_API_KEY_ENV) {
            config = config.with_api_key(key);
        }
        Self::with_config(config, model)
    }

    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        let api_base = async_openai::config::Config::api_base(&config).to_string();
        Self {
            client: Client::with_config(config),
            api_base,
            model: model.into(),
            tools: None,
            temperature: None,
            tool_choice: None,
        }
    }

    /// Groq endpoint with the given key.
    pub fn groq_with_key(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(GROQ_API_BASE)
            .with_api_key(api_key.into());
        Self::with_config(config, model)
    }

    /// Groq endpoint, key from `GROQ_API_KEY`. An unset or empty key is an error.
    pub fn groq(model: impl Into<String>) -> Result<Self, AgentError> {
        let key = env_key(GROQ_API_KEY_ENV).ok_or_else(|| {
            AgentError::ExecutionFailed(format!("{} is not set", GROQ_API_KEY_ENV))
        })?;
        Ok(Self::groq_with_key(model, key))
    }

    /// Groq when `GROQ_API_KEY` is set, else OpenAI (or `OPENAI_BASE_URL`) when
    /// `OPENAI_API_KEY` is set. Empty values count as unset.
    pub fn from_env(model: impl Into<String>) -> Result<Self, AgentError> {
        if let Some(key) = env_key(GROQ_API_KEY_ENV) {
            return Ok(Self::groq_with_key(model, key));
        }
        if env_key(OPENAI_API_KEY_ENV).is_some() {
            return Ok(Self::new(model));
        }
        Err(AgentError::ExecutionFailed(format!(
            "set {} or {}",
            GROQ_API_KEY_ENV, OPENAI_API_KEY_ENV
        )))
    }

    /// Binds tools; the model may then answer with tool calls.
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Overrides the tool choice (default `auto` when tools are bound).
    pub fn with_tool_choice(mut self, mode: ToolChoiceMode) -> Self {
        self.tool_choice = Some(mode);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn messages_to_request(
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        messages.iter().map(Self::message_to_request).collect()
    }

    fn message_to_request(message: &Message) -> Result<ChatCompletionRequestMessage, AgentError> {
        let wire = match message {
            Message::System { content } => {
                return Ok(ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(content.as_str()),
                ))
            }
            Message::Human { content } => {
                return Ok(ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(content.as_str()),
                ))
            }
            Message::Assistant {
                content,
                tool_calls,
            } if tool_calls.is_empty() => {
                return Ok(ChatCompletionRequestMessage::Assistant(content.as_str().into()))
            }
            Message::Assistant {
                content,
                tool_calls,
            } => {
                let calls: Vec<Value> = tool_calls
                    .iter()
                    .map(|c| {
                        json!({
                            "id": c.id,
                            "type": "function",
                            "function": { "name": c.name, "arguments": arguments_to_wire(&c.arguments) },
                        })
                    })
                    .collect();
                let content = if content.is_empty() {
                    Value::Null
                } else {
                    Value::String(content.clone())
                };
                json!({ "role": "assistant", "content": content, "tool_calls": calls })
            }
            Message::Tool {
                call_id, content, ..
            } => json!({ "role": "tool", "content": content, "tool_call_id": call_id }),
        };
        serde_json::from_value(wire).map_err(|e| {
            AgentError::ReasoningStep(format!(
                "cannot encode {} message for chat completions: {}",
                message.role(),
                e
            ))
        })
    }

    fn chat_tools(tools: &[ToolSpec]) -> Vec<ChatCompletionTools> {
        tools
            .iter()
            .map(|t| {
                ChatCompletionTools::Function(ChatCompletionTool {
                    function: FunctionObject {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: Some(t.input_schema.clone()),
                        ..Default::default()
                    },
                })
            })
            .collect()
    }
}

/// Arguments that failed to parse are kept as the raw string and sent back unchanged.
fn arguments_to_wire(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

/// Parses the model's argument string; unparseable text stays a string so the tool
/// step rejects it as invalid arguments.
fn parse_arguments(raw: String) -> Value {
    if raw.trim().is_empty() {
        return json!({});
    }
    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw),
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages)?);

        if let Some(tools) = self.tools.as_ref().filter(|t| !t.is_empty()) {
            args.tools(Self::chat_tools(tools));
            let opt = match self.tool_choice.unwrap_or_default() {
                ToolChoiceMode::Auto => ToolChoiceOptions::Auto,
                ToolChoiceMode::None => ToolChoiceOptions::None,
                ToolChoiceMode::Required => ToolChoiceOptions::Required,
            };
            args.tool_choice(ChatCompletionToolChoiceOption::Mode(opt));
        }
        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        let request = args
            .build()
            .map_err(|e| AgentError::ReasoningStep(format!("request build failed: {}", e)))?;

        debug!(
            trace_id = %trace_id,
            api_base = %self.api_base,
            model = %self.model,
            message_count = messages.len(),
            tools_count = self.tools.as_ref().map_or(0, |t| t.len()),
            temperature = ?self.temperature,
            tool_choice = ?self.tool_choice,
            "chat completions create"
        );
        if let Ok(js) = serde_json::to_string(&request) {
            trace!(trace_id = %trace_id, request = %js, "chat completions request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ReasoningStep(format!("chat completions API error: {}", e)))?;

        if let Ok(js) = serde_json::to_string(&response) {
            trace!(trace_id = %trace_id, response = %js, "chat completions response body");
        }

        let usage = response.usage.as_ref().map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::ReasoningStep("model returned no choices".to_string()))?;

        let msg = choice.message;
        let tool_calls: Vec<ToolCall> = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| match tc {
                ChatCompletionMessageToolCalls::Function(f) => Some(ToolCall::new(
                    f.id,
                    f.function.name,
                    parse_arguments(f.function.arguments),
                )),
                _ => None,
            })
            .collect();
        debug!(
            trace_id = %trace_id,
            tool_calls = tool_calls.len(),
            usage = ?usage,
            "chat completions reply"
        );

        Ok(LlmResponse {
            content: msg.content.unwrap_or_default(),
            tool_calls,
            usage,
        })
    }
}
