/// Chat History Example
///
/// Keeps a conversation history on the caller side and folds it into each new
/// prompt with the history-aware prompt builder, so the model can answer
/// follow-up questions.
///
/// To run this example:
/// 1. Create a .env file in the project root with, e.g.:
///    LLM_PROVIDER=anthropic
///    LLM_MODEL=claude-haiku-4-5
///    ANTHROPIC_API_KEY=sk-ant-...
/// 2. Run: cargo run --example chat_history

use llm_hooks::llm::{
    create_client, prompt, ConversationHistory, ConversationTurn, Orchestrator, PromptRunner,
    Settings, TracingObserver,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let client = create_client(&settings.provider).await?;
    let runner = PromptRunner::new(
        Orchestrator::new(client).with_observer(TracingObserver::new()),
        settings.generation,
    );

    let questions = [
        "Name one systems programming language created after 2005.",
        "Who started it?",
        "What year was its 1.0 release?",
    ];

    let mut history = ConversationHistory::new();
    for question in questions {
        println!("=== Payload sent as the user turn ===");
        println!("{}\n", prompt::build(&history, question)?);

        let answer = runner.chat_completion(question, &history).await?;
        println!("=== Answer ===\n{}\n", answer);

        history.push(ConversationTurn::user(question));
        history.push(ConversationTurn::assistant(answer));
    }

    Ok(())
}
