/// Observed Completion Example
///
/// Sends one prompt through the orchestrator with three observers attached:
/// - ConsoleObserver prints the prompt and the response between banners
/// - TracingObserver logs request id, model and token usage
/// - an FnObserver built from two closures counts requests
///
/// To run this example:
/// 1. Create a .env file in the project root with, e.g.:
///    LLM_PROVIDER=openai
///    OPENAI_API_KEY=sk-...
/// 2. Run: cargo run --example observed_completion

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use llm_hooks::llm::{
    create_client, CompletionRequest, ConsoleObserver, ConversationHistory, ConversationTurn,
    FnObserver, Orchestrator, Settings, TracingObserver, DEFAULT_SYSTEM_PROMPT,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    println!("Provider: {:?}", settings.provider.kind());
    println!("Model: {}\n", settings.generation.model);

    let client = create_client(&settings.provider).await?;

    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let (s, f) = (started.clone(), finished.clone());
    let counter = FnObserver::new()
        .on_start(move |_, _, _| {
            s.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .on_end(move |_, _| {
            f.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

    let orchestrator = Orchestrator::new(client)
        .with_observer(ConsoleObserver::new())
        .with_observer(TracingObserver::new())
        .with_observer(counter);

    let history = ConversationHistory::from(vec![
        ConversationTurn::system(DEFAULT_SYSTEM_PROMPT),
        ConversationTurn::user("Write a haiku about the Rust borrow checker."),
    ]);
    let request = CompletionRequest::new(history, settings.generation.clone());

    match orchestrator.complete(request).await {
        Ok(result) => {
            println!("\nFinish reason: {:?}", result.metadata.finish_reason);
            if let Some(usage) = result.metadata.usage {
                println!(
                    "Tokens: {} in, {} out, {} total",
                    usage.input_tokens, usage.output_tokens, usage.total_tokens
                );
            }
        }
        Err(err) => {
            eprintln!("\nRequest failed: {} (retryable: {})", err, err.is_retryable());
        }
    }

    println!(
        "\nHooks fired: {} start, {} end",
        started.load(Ordering::SeqCst),
        finished.load(Ordering::SeqCst)
    );
    Ok(())
}
