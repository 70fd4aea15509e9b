use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use llm_hooks::llm::{
    create_client, ConsoleObserver, ConversationHistory, ConversationTurn, Orchestrator,
    PromptRunner, ProviderKind, Settings, SettingsOverrides, TracingObserver,
};

#[derive(Parser)]
#[command(name = "llm-hooks")]
#[command(author, version, about = "Prompt an LLM with observer hooks around every request", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// openai, azure-openai, anthropic or vertex-claude (overrides LLM_PROVIDER)
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    /// Model identifier (overrides LLM_MODEL)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Sampling temperature in [0.0, 2.0] (overrides LLM_TEMPERATURE)
    #[arg(short, long, global = true)]
    temperature: Option<f32>,

    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    /// System prompt sent ahead of every request
    #[arg(long, global = true)]
    system: Option<String>,

    /// Do not echo prompts and responses between banners
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one prompt and print the response
    Ask { prompt: String },

    /// Read prompts from stdin, keeping the conversation history between them
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let settings = Settings::from_env_with(SettingsOverrides {
        provider: cli.provider,
        model: cli.model,
        temperature: cli.temperature,
        max_tokens: cli.max_tokens,
    })?;

    info!(
        provider = ?settings.provider.kind(),
        model = %settings.generation.model,
        "initializing completion client"
    );
    let client = create_client(&settings.provider).await?;

    let console_attached = !cli.quiet;
    let mut orchestrator = Orchestrator::new(client).with_observer(TracingObserver::new());
    if console_attached {
        orchestrator.add_observer(Box::new(ConsoleObserver::new()));
    }

    let mut runner = PromptRunner::new(orchestrator, settings.generation);
    if let Some(system) = cli.system {
        runner = runner.with_system_prompt(system);
    }

    match cli.command {
        Commands::Ask { prompt } => {
            let mut stdout = std::io::stdout();
            runner.print_response(&prompt, &mut stdout).await?;
        }
        Commands::Chat => run_chat(&runner, !console_attached).await?,
    }

    Ok(())
}

/// `print_responses` is off when a `ConsoleObserver` already echoes each response
async fn run_chat(runner: &PromptRunner, print_responses: bool) -> Result<()> {
    let mut history = ConversationHistory::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Type a prompt and press enter. 'exit' or Ctrl-D quits.");
    while let Some(line) = lines.next_line().await? {
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt == "exit" || prompt == "quit" {
            break;
        }

        let response = runner.chat_completion(prompt, &history).await?;
        if print_responses {
            println!("{}\n", response);
        }

        history.push(ConversationTurn::user(prompt));
        history.push(ConversationTurn::assistant(response));
        debug!(turns = history.len(), "conversation history updated");
    }

    Ok(())
}
