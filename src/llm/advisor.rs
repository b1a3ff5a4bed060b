//! Tax answers on top of a [`ChatClient`]: prompt selection, repair of
//! length-truncated output, and paragraph formatting.

use log::{ info, warn };
use std::sync::Arc;

use super::chat::{ ChatClient, ChatRequest };
use crate::config::prompt::PromptConfig;
use crate::error::CompletionError;
use crate::formatter::{ split_into_paragraphs, DEFAULT_WORDS_PER_PARAGRAPH };

pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_CONTINUATION_MAX_TOKENS: u32 = 1000;
/// Characters of truncated output quoted back in the continuation prompt.
pub const CONTINUATION_TAIL_CHARS: usize = 30;

#[derive(Clone)]
pub struct TaxAdvisorClient {
    chat_client: Arc<dyn ChatClient>,
    prompts: Arc<PromptConfig>,
    max_tokens: u32,
    continuation_max_tokens: u32,
    words_per_paragraph: usize,
}

impl TaxAdvisorClient {
    pub fn new(chat_client: Arc<dyn ChatClient>, prompts: Arc<PromptConfig>) -> Self {
        Self {
            chat_client,
            prompts,
            max_tokens: DEFAULT_MAX_TOKENS,
            continuation_max_tokens: DEFAULT_CONTINUATION_MAX_TOKENS,
            words_per_paragraph: DEFAULT_WORDS_PER_PARAGRAPH,
        }
    }

    pub fn with_token_budgets(mut self, max_tokens: u32, continuation_max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self.continuation_max_tokens = continuation_max_tokens;
        self
    }

    pub fn with_words_per_paragraph(mut self, words_per_paragraph: usize) -> Self {
        self.words_per_paragraph = words_per_paragraph;
        self
    }

    /// Answers `question`, or elaborates on `previous_answer` when `detailed` is set.
    ///
    /// Without a previous answer a detailed request falls back to the plain
    /// answer prompt.
    pub async fn get_response(
        &self,
        question: &str,
        detailed: bool,
        previous_answer: Option<&str>
    ) -> Result<String, CompletionError> {
        let prompt = match previous_answer {
            Some(previous) if detailed => self.prompts.detailed_prompt(question, previous),
            _ => self.prompts.answer_prompt(question),
        };

        let completion = self.chat_client.complete(&ChatRequest {
            prompt,
            max_tokens: self.max_tokens,
        }).await?;

        let mut text = completion.text.trim().to_string();
        if completion.is_truncated() {
            info!("Completion hit the token limit, requesting a continuation");
            let continuation = self.fetch_continuation(&text).await;
            text.push_str(&continuation);
        }

        Ok(split_into_paragraphs(&text, self.words_per_paragraph))
    }

    /// Best effort: any failure yields an empty string.
    async fn fetch_continuation(&self, truncated: &str) -> String {
        let request = ChatRequest {
            prompt: self.prompts.continuation_prompt(tail(truncated, CONTINUATION_TAIL_CHARS)),
            max_tokens: self.continuation_max_tokens,
        };
        match self.chat_client.complete(&request).await {
            Ok(completion) => completion.text.trim().to_string(),
            Err(e) => {
                warn!("Continuation request failed, keeping truncated answer: {}", e);
                String::new()
            }
        }
    }
}

/// The last `n` characters of `text`.
pub fn tail(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let start = text
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &text[start..]
}
