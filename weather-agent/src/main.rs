//! weather-agent: asks a model about the weather, letting it call the mock `weather` tool.
//!
//! Loads `.env`, binds the model to the tool registry, runs the loop once and prints the
//! final message. `--mock` replaces the model with a scripted one (no network).

mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use toolloop::llm::GROQ_API_KEY_ENV;
use toolloop::{
    AgentError, AgentGraphOptions, AgentRunner, ChatOpenAI, Dispatcher, LlmClient, Message,
    MockLlm, RunConfig, RunError, ToolRegistry, WeatherTool,
};

const DEFAULT_MESSAGE: &str = "What is the weather in sf";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Compiled agent graph.
    Graph,
    /// Explicit dispatcher state machine.
    Loop,
}

#[derive(Parser, Debug)]
#[command(name = "weather-agent")]
#[command(about = "Ask a model about the weather; it may call the mock weather tool")]
struct Args {
    /// User message (or pass it as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: user message when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Thread id attached to log events
    #[arg(long, value_name = "ID", default_value = "11")]
    thread_id: String,

    /// Chat model name
    #[arg(long, env = "TOOLLOOP_MODEL", default_value = "llama3-8b-8192")]
    model: String,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.0)]
    temperature: f32,

    /// Optional system prompt placed before the user message
    #[arg(long, value_name = "TEXT")]
    system: Option<String>,

    /// Use a scripted model instead of the API
    #[arg(long)]
    mock: bool,

    /// Which driver runs the loop
    #[arg(long, value_enum, default_value_t = Engine::Graph)]
    engine: Engine,

    /// Verbose: log node enter/exit
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn user_message(&self) -> String {
        match &self.message {
            Some(m) => m.clone(),
            None if !self.rest.is_empty() => self.rest.join(" "),
            None => DEFAULT_MESSAGE.to_string(),
        }
    }
}

/// Location the scripted model asks about: the text after the last " in ", if any.
fn mock_query(message: &str) -> String {
    let tail = message
        .rsplit_once(" in ")
        .map(|(_, loc)| loc)
        .unwrap_or(message);
    tail.trim().trim_end_matches('?').trim().to_string()
}

fn build_llm(args: &Args, tools: &ToolRegistry) -> Result<Arc<dyn LlmClient>, AgentError> {
    if args.mock {
        return Ok(Arc::new(MockLlm::weather_round_trip(mock_query(
            &args.user_message(),
        ))));
    }
    let llm = ChatOpenAI::from_env(&args.model).map_err(|_| {
        AgentError::ExecutionFailed(format!(
            "set {} (or OPENAI_API_KEY), or pass --mock",
            GROQ_API_KEY_ENV
        ))
    })?;
    tracing::debug!(model = %args.model, api_base = llm.api_base(), "using chat completions client");
    Ok(Arc::new(
        llm.with_tools(tools.specs())
            .with_temperature(args.temperature),
    ))
}

async fn run(args: Args, cancel: CancellationToken) -> Result<String, RunError> {
    let tools = ToolRegistry::builder().register(WeatherTool::new())?.build();
    let llm = build_llm(&args, &tools)?;
    let tools = Arc::new(tools);
    let config = RunConfig::new()
        .with_thread_id(args.thread_id.clone())
        .with_cancellation(cancel);
    let message = args.user_message();

    let messages: Vec<Message> = match args.engine {
        Engine::Graph => {
            let options = AgentGraphOptions {
                verbose: args.verbose,
                parallel_tools: false,
            };
            let mut runner = AgentRunner::new(llm, tools, options)?;
            if let Some(system) = &args.system {
                runner = runner.with_system_prompt(system.as_str());
            }
            runner.invoke(&message, Some(config)).await?.messages.into_vec()
        }
        Engine::Loop => {
            let mut initial = Vec::with_capacity(2);
            if let Some(system) = &args.system {
                initial.push(Message::system(system.as_str()));
            }
            initial.push(Message::human(message));
            Dispatcher::new(llm, tools).run(initial, Some(config)).await?
        }
    };
    Ok(messages
        .last()
        .map(|m| m.content().to_string())
        .unwrap_or_default())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();
    if let Err(e) = logging::init(args.verbose) {
        eprintln!("logging init failed: {}", e);
    }

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    match run(args, cancel).await {
        Ok(reply) => {
            println!("{}", reply);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
