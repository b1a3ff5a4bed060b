pub mod agent;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;

use agent::TaxAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("History Store Type: {}", args.history_type);
    info!("Database URL: {}", args.database_url);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Chat API Key Set: {}", !args.chat_api_key.trim().is_empty());
    info!("Max Tokens: {} (continuation {})", args.max_tokens, args.continuation_max_tokens);
    info!("Temperature: {}", args.temperature);
    info!(
        "Retry: {} attempts, {}ms base backoff, {}s timeout",
        args.max_retries,
        args.backoff_base_ms,
        args.request_timeout_secs
    );
    info!("Words Per Paragraph: {}", args.words_per_paragraph);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let agent = Arc::new(TaxAgent::new(args.clone()).await?);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
