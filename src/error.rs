use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::Json;
use log::error;
use serde_json::json;
use thiserror::Error;

/// Outcome of a completion request that did not produce text.
///
/// The messages are shown to API callers verbatim, so they stay free of
/// credentials and request bodies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Error: completion API key not found. Please set the OPENAI_API_KEY environment variable.")]
    MissingCredential,

    #[error("Error: completion API key is malformed. Check the OPENAI_API_KEY environment variable.")]
    InvalidCredential,

    #[error(
        "Error: The request timed out while communicating with the completion API. Please try again later."
    )]
    Timeout,

    #[error("Error communicating with completion API: gave up after {attempts} attempts (last status {status})")]
    RetriesExhausted { attempts: u32, status: u16 },

    #[error("Error communicating with completion API: upstream returned status {0}")]
    Status(u16),

    #[error("Error communicating with completion API: {0}")]
    Transport(String),

    #[error("Error communicating with completion API: invalid response ({0})")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("unsupported history store type: {0}")]
    UnsupportedType(String),
}

/// Terminal failure of a single `/api/tax-prompt` request.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("No question provided.")]
    EmptyQuestion,

    #[error("Please ask a valid tax-related question.")]
    NotTaxRelated,

    #[error("{0}")]
    Upstream(String),

    #[error(transparent)]
    Storage(#[from] HistoryError),
}

impl From<CompletionError> for AgentError {
    fn from(err: CompletionError) -> Self {
        AgentError::Upstream(err.to_string())
    }
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AgentError::EmptyQuestion | AgentError::NotTaxRelated =>
                (StatusCode::BAD_REQUEST, self.to_string()),
            AgentError::Upstream(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
            AgentError::Storage(e) => {
                error!("Chat history error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
