//! End-to-end tests of the HTTP routes against a scripted completion client.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{ Request, StatusCode };
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{ json, Value };
use std::collections::VecDeque;
use std::sync::{ Arc, Mutex };
use tower::ServiceExt;

use tax_advisor::agent::TaxAgent;
use tax_advisor::classifier::Classifier;
use tax_advisor::config::prompt::PromptConfig;
use tax_advisor::error::CompletionError;
use tax_advisor::history::memory::MemoryChatLog;
use tax_advisor::llm::advisor::TaxAdvisorClient;
use tax_advisor::llm::chat::{ ChatClient, ChatRequest, Completion, FinishReason };
use tax_advisor::server::api::{ router, AppState };

#[derive(Default)]
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<Completion, CompletionError>>>,
    calls: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    fn reply(&self, text: &str, finish_reason: FinishReason) {
        self.replies.lock().unwrap().push_back(Ok(Completion { text: text.to_string(), finish_reason }));
    }

    fn fail(&self, err: CompletionError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion, CompletionError> {
        self.calls.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::Transport("no scripted reply".into())))
    }

    fn get_model(&self) -> String {
        "scripted".into()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

fn app() -> (Router, Arc<ScriptedClient>) {
    let client = Arc::new(ScriptedClient::default());
    let advisor = TaxAdvisorClient::new(client.clone(), Arc::new(PromptConfig::default()));
    let agent = TaxAgent::from_parts(advisor, Arc::new(MemoryChatLog::new()), Classifier::default());
    (router(AppState { agent: Arc::new(agent) }), client)
}

async fn ask(app: &Router, question: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/tax-prompt")
        .header("content-type", "application/json")
        .body(Body::from(question.to_string()))
        .unwrap();
    send(app, req).await
}

async fn chats(app: &Router) -> Value {
    let req = Request::builder().uri("/api/get-chats").body(Body::empty()).unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    body
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn answers_and_lists_chats_newest_first() {
    let (app, client) = app();
    client.reply("Use Form 1040.", FinishReason::Stop);
    client.reply("Box 1 shows wages.", FinishReason::Stop);

    let (status, body) = ask(&app, json!({ "question": "Which form do I file?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "answer": "Use Form 1040." }));

    let (status, _) = ask(&app, json!({ "question": "What is on a W-2?" })).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        chats(&app).await,
        json!([
            { "question": "What is on a W-2?", "answer": "Box 1 shows wages." },
            { "question": "Which form do I file?", "answer": "Use Form 1040." },
        ])
    );
}

#[tokio::test]
async fn empty_question_is_a_bad_request() {
    let (app, client) = app();
    for body in [json!({ "question": "" }), json!({ "question": "   " }), json!({})] {
        let (status, resp) = ask(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp, json!({ "error": "No question provided." }));
    }
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn off_topic_question_is_a_bad_request() {
    let (app, client) = app();
    let (status, resp) = ask(&app, json!({ "question": "What's the weather?" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, json!({ "error": "Please ask a valid tax-related question." }));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn upstream_error_is_a_server_error() {
    let (app, client) = app();
    client.fail(CompletionError::MissingCredential);

    let (status, resp) = ask(&app, json!({ "question": "Can I claim a dependent?" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp["error"], CompletionError::MissingCredential.to_string());
    assert_eq!(chats(&app).await, json!([]));
}

#[tokio::test]
async fn repeated_question_hits_the_log() {
    let (app, client) = app();
    client.reply("Yes, mortgage interest is deductible.", FinishReason::Stop);

    let question = json!({ "question": "Is mortgage interest a deduction?" });
    let (_, first) = ask(&app, question.clone()).await;
    let (status, second) = ask(&app, question).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(client.calls().len(), 1);
    assert_eq!(chats(&app).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn follow_up_stores_detailed_answer() {
    let (app, client) = app();
    client.reply("An audit is an IRS review.", FinishReason::Stop);
    client.reply("Audits can be by mail or in person.", FinishReason::Stop);

    ask(&app, json!({ "question": "What is an audit?" })).await;
    let (status, body) = ask(&app, json!({ "question": "Elaborate please" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Audits can be by mail or in person.");

    let calls = client.calls();
    assert!(calls[1].prompt.contains("Response: \"An audit is an IRS review.\""));
    assert!(calls[1].prompt.contains("Question: \"What is an audit?\""));

    let history = chats(&app).await;
    assert_eq!(history[0]["question"], "Elaborate please");
    assert_eq!(history[0]["answer"], "Audits can be by mail or in person.");
}

#[tokio::test]
async fn truncated_answer_is_stored_with_continuation() {
    let (app, client) = app();
    client.reply("Capital gains held over a year are taxed at", FinishReason::Length);
    client.reply("0%, 15% or 20%.", FinishReason::Stop);

    let (status, body) = ask(&app, json!({ "question": "How are capital gains taxed?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Capital gains held over a year are taxed at0%, 15% or 20%.");
    assert!(client.calls()[1].prompt.starts_with("Continue from: '"));
    assert_eq!(chats(&app).await[0]["answer"], body["answer"]);
}

#[tokio::test]
async fn landing_page_and_health() {
    let (app, _) = app();

    let resp = app.clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&html).contains("/api/tax-prompt"));

    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
