//! SQLite implementation of [`ChatLog`].
//!
//! Migrations under `./migrations` are embedded at compile time and run on
//! [`SqliteChatLog::connect`]. Queries use the runtime-checked `sqlx::query`
//! form, so no `DATABASE_URL` is needed to build.

use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use log::{ info, warn };
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error::HistoryError;
use crate::history::ChatLog;
use crate::models::chat::ChatRecord;

type ChatRow = (i64, String, String, String);

#[derive(Clone, Debug)]
pub struct SqliteChatLog {
    pool: SqlitePool,
}

impl SqliteChatLog {
    /// Opens the database at `url` (e.g. `sqlite://chat_history.db?mode=rwc`)
    /// and applies pending migrations.
    pub async fn connect(url: &str) -> Result<Self, HistoryError> {
        let mut options = SqlitePoolOptions::new().max_connections(5);
        if url.contains(":memory:") {
            // Every connection to `:memory:` is a separate database; keep exactly one alive.
            options = options.max_connections(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = options.connect(url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Chat history database ready at {}", url);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn into_record((id, question, answer, created_at): ChatRow) -> ChatRecord {
    let created_at = created_at.parse::<DateTime<Utc>>().unwrap_or_else(|e| {
        warn!("Chat {} has unparseable created_at '{}': {}", id, created_at, e);
        DateTime::<Utc>::UNIX_EPOCH
    });
    ChatRecord { id, question, answer, created_at }
}

#[async_trait]
impl ChatLog for SqliteChatLog {
    async fn append(&self, question: &str, answer: &str) -> Result<ChatRecord, HistoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO chats (question, answer, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(question)
        .bind(answer)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(ChatRecord {
            id: result.last_insert_rowid(),
            question: question.to_string(),
            answer: answer.to_string(),
            created_at,
        })
    }

    async fn latest(&self) -> Result<Option<ChatRecord>, HistoryError> {
        let row: Option<ChatRow> = sqlx::query_as(
            "SELECT id, question, answer, created_at FROM chats ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_record))
    }

    async fn find_by_question(&self, question: &str) -> Result<Option<ChatRecord>, HistoryError> {
        let row: Option<ChatRow> = sqlx::query_as(
            "SELECT id, question, answer, created_at FROM chats \
             WHERE question = ?1 ORDER BY id ASC LIMIT 1",
        )
        .bind(question)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_record))
    }

    async fn all(&self) -> Result<Vec<ChatRecord>, HistoryError> {
        let rows: Vec<ChatRow> = sqlx::query_as(
            "SELECT id, question, answer, created_at FROM chats ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(into_record).collect())
    }
}
