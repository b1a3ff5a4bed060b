use crate::agent::TaxAgent;
use crate::error::AgentError;
use crate::models::chat::ChatEntry;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    extract::State,
    response::{ Html, IntoResponse },
    Json,
};
use serde::{ Deserialize, Serialize };
use serde_json::json;
use tower_http::cors::{ Any, CorsLayer };

const INDEX_HTML: &str = include_str!("../../templates/index.html");

#[derive(Deserialize, Default)]
pub struct TaxPromptRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TaxPromptResponse {
    pub answer: String,
}

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<TaxAgent>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/tax-prompt", post(tax_prompt_handler))
        .route("/api/get-chats", get(get_chats_handler))
        .layer(cors)
        .with_state(state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn tax_prompt_handler(
    State(state): State<AppState>,
    Json(req): Json<TaxPromptRequest>,
) -> Result<Json<TaxPromptResponse>, AgentError> {
    let question = req.question.unwrap_or_default();
    let answer = state.agent.handle_question(&question).await?;
    Ok(Json(TaxPromptResponse { answer }))
}

async fn get_chats_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatEntry>>, AgentError> {
    let chats = state.agent.chat_history().await?;
    Ok(Json(chats.into_iter().map(ChatEntry::from).collect()))
}
