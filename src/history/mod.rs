pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use crate::cli::Args;
use crate::error::HistoryError;
use crate::models::chat::ChatRecord;

/// Append-only log of question/answer pairs.
#[async_trait]
pub trait ChatLog: Send + Sync {
    async fn append(&self, question: &str, answer: &str) -> Result<ChatRecord, HistoryError>;

    /// Record with the highest id.
    async fn latest(&self) -> Result<Option<ChatRecord>, HistoryError>;

    /// First record whose question equals `question` byte for byte.
    async fn find_by_question(&self, question: &str) -> Result<Option<ChatRecord>, HistoryError>;

    /// Every record, newest first.
    async fn all(&self) -> Result<Vec<ChatRecord>, HistoryError>;
}

pub async fn create_chat_log(args: &Args) -> Result<Arc<dyn ChatLog>, HistoryError> {
    match args.history_type.to_lowercase().as_str() {
        "sqlite" => {
            let store = sqlite::SqliteChatLog::connect(&args.database_url).await?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(memory::MemoryChatLog::new())),
        other => Err(HistoryError::UnsupportedType(other.to_string())),
    }
}

pub async fn initialize_chat_log(args: &Args) -> Result<Arc<dyn ChatLog>, HistoryError> {
    match args.history_type.to_lowercase().as_str() {
        "sqlite" => info!("Chat history will be stored in: sqlite at {}", args.database_url),
        other => info!("Chat history will be stored in: {}", other),
    }
    create_chat_log(args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn unknown_store_type_is_rejected() {
        let args = Args::parse_from(["tax-advisor", "--history-type", "redis"]);
        let err = create_chat_log(&args).await.err().unwrap();
        assert!(matches!(err, HistoryError::UnsupportedType(ref t) if t == "redis"));
    }

    #[tokio::test]
    async fn memory_store_starts_empty() {
        let args = Args::parse_from(["tax-advisor", "--history-type", "Memory"]);
        let log = create_chat_log(&args).await.unwrap();
        assert!(log.latest().await.unwrap().is_none());
    }
}
