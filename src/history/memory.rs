use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::HistoryError;
use crate::history::ChatLog;
use crate::models::chat::ChatRecord;

/// Process-local chat log. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryChatLog {
    records: RwLock<Vec<ChatRecord>>,
}

impl MemoryChatLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatLog for MemoryChatLog {
    async fn append(&self, question: &str, answer: &str) -> Result<ChatRecord, HistoryError> {
        let mut records = self.records.write().await;
        let record = ChatRecord {
            id: records.last().map(|r| r.id + 1).unwrap_or(1),
            question: question.to_string(),
            answer: answer.to_string(),
            created_at: Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn latest(&self) -> Result<Option<ChatRecord>, HistoryError> {
        Ok(self.records.read().await.last().cloned())
    }

    async fn find_by_question(&self, question: &str) -> Result<Option<ChatRecord>, HistoryError> {
        Ok(self.records.read().await.iter().find(|r| r.question == question).cloned())
    }

    async fn all(&self) -> Result<Vec<ChatRecord>, HistoryError> {
        Ok(self.records.read().await.iter().rev().cloned().collect())
    }
}
