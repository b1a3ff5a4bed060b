use async_trait::async_trait;
use log::{ debug, error };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;

use super::{ ChatClient, ChatRequest, Completion, FinishReason };
use crate::error::CompletionError;
use crate::llm::retry::{ is_retryable, with_retry, AttemptError, RetryPolicy };
use crate::llm::LlmConfig;

pub struct OpenAIChatClient {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f32,
    retry: RetryPolicy,
}

#[derive(Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: Option<String>,
        model: String,
        base_url: String,
        temperature: f32,
        retry: RetryPolicy,
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
            base_url,
            temperature,
            retry,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Self::new(
            config.api_key.clone(),
            config.completion_model.clone(),
            config.base_url.clone(),
            config.temperature,
            config.retry.clone(),
        )
    }

    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    async fn attempt(
        &self,
        url: &str,
        auth: &HeaderValue,
        body: &OpenAIChatRequest<'_>
    ) -> Result<OpenAIResponse, AttemptError> {
        let resp = self.http
            .post(url)
            .header(AUTHORIZATION, auth.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AttemptError::Fatal(CompletionError::Timeout)
                } else {
                    AttemptError::Fatal(CompletionError::Transport(e.to_string()))
                }
            })?;

        let status = resp.status().as_u16();
        if is_retryable(status) {
            return Err(AttemptError::Retryable(status));
        }
        if !resp.status().is_success() {
            error!("Completion API returned status {}", status);
            return Err(AttemptError::Fatal(CompletionError::Status(status)));
        }

        resp.json::<OpenAIResponse>().await.map_err(|e| {
            if e.is_timeout() {
                AttemptError::Fatal(CompletionError::Timeout)
            } else {
                AttemptError::Fatal(CompletionError::InvalidResponse(e.to_string()))
            }
        })
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingCredential)?;
        let auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_|
            CompletionError::InvalidCredential
        )?;

        let url = self.endpoint();
        let body = OpenAIChatRequest {
            model: &self.model,
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: request.prompt.trim().to_string(),
            }],
            max_tokens: request.max_tokens,
            temperature: self.temperature,
        };

        debug!("Sending completion request to {} (model={}, max_tokens={})", url, self.model, request.max_tokens);

        let resp = with_retry(&self.retry, || self.attempt(&url, &auth, &body)).await?;

        let choice = resp.choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::InvalidResponse("no choices in response".to_string()))?;

        Ok(Completion {
            text: choice.message.content.unwrap_or_default().trim().to_string(),
            finish_reason: FinishReason::parse(choice.finish_reason.as_deref()),
        })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
