pub mod advisor;
pub mod chat;
pub mod retry;

use crate::cli::Args;
use retry::RetryPolicy;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub completion_model: String,
    pub base_url: String,
    pub temperature: f32,
    pub retry: RetryPolicy,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            completion_model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            retry: RetryPolicy::default(),
        }
    }
}

impl LlmConfig {
    pub fn from_args(args: &Args) -> Self {
        let api_key = Some(args.chat_api_key.trim().to_string()).filter(|k| !k.is_empty());
        Self {
            api_key,
            completion_model: args.chat_model.clone(),
            base_url: args.chat_base_url.clone(),
            temperature: args.temperature,
            retry: RetryPolicy {
                max_attempts: args.max_retries.max(1),
                base_delay: Duration::from_millis(args.backoff_base_ms),
                timeout: Duration::from_secs(args.request_timeout_secs),
            },
        }
    }
}
