use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };

/// One stored question/answer pair. Records are never updated or deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Wire shape of a record in `/api/get-chats`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub question: String,
    pub answer: String,
}

impl From<ChatRecord> for ChatEntry {
    fn from(record: ChatRecord) -> Self {
        Self {
            question: record.question,
            answer: record.answer,
        }
    }
}
