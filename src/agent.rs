use crate::classifier::Classifier;
use crate::cli::Args;
use crate::config::prompt::{ self, PromptConfig };
use crate::error::AgentError;
use crate::history::{ initialize_chat_log, ChatLog };
use crate::llm::advisor::TaxAdvisorClient;
use crate::llm::chat::{ new_client as new_chat_client, ChatClient };
use crate::llm::LlmConfig;
use crate::models::chat::ChatRecord;

use log::{ info, warn, error };
use std::error::Error;
use std::sync::Arc;

/// Answers tax questions and records every generated answer.
///
/// Holds no per-conversation state: follow-ups and repeated questions are
/// resolved from the chat log on every call.
#[derive(Clone)]
pub struct TaxAgent {
    advisor: TaxAdvisorClient,
    chat_log: Arc<dyn ChatLog>,
    classifier: Arc<Classifier>,
}

impl TaxAgent {
    fn initialize_chat_client(args: &Args) -> Result<Arc<dyn ChatClient>, Box<dyn Error + Send + Sync>> {
        let config = LlmConfig::from_args(args);
        if config.api_key.is_none() {
            warn!("No completion API key configured; tax questions will fail until OPENAI_API_KEY is set.");
        }
        let chat_client = new_chat_client(&config)?;
        info!(
            "Chat client configured: Model={}, BaseURL={:?}",
            chat_client.get_model(),
            chat_client.get_base_url().as_deref().unwrap_or("adapter default")
        );
        Ok(chat_client)
    }

    fn load_prompt_config(args: &Args) -> Result<Arc<PromptConfig>, Box<dyn Error + Send + Sync>> {
        match &args.prompts_path {
            Some(path) => prompt::load_prompts(path),
            None => {
                info!("Using built-in prompt templates");
                Ok(Arc::new(PromptConfig::default()))
            }
        }
    }

    pub async fn new(args: Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let chat_client = Self::initialize_chat_client(&args)?;
        let prompts = Self::load_prompt_config(&args)?;
        let chat_log = initialize_chat_log(&args).await?;

        let advisor = TaxAdvisorClient::new(chat_client, prompts)
            .with_token_budgets(args.max_tokens, args.continuation_max_tokens)
            .with_words_per_paragraph(args.words_per_paragraph);

        Ok(Self::from_parts(advisor, chat_log, Classifier::default()))
    }

    pub fn from_parts(advisor: TaxAdvisorClient, chat_log: Arc<dyn ChatLog>, classifier: Classifier) -> Self {
        Self {
            advisor,
            chat_log,
            classifier: Arc::new(classifier),
        }
    }

    /// Runs one question through follow-up detection, validation, the exact-match
    /// cache and finally the completion API.
    pub async fn handle_question(&self, question: &str) -> Result<String, AgentError> {
        let question = question.trim();

        if self.classifier.is_follow_up(question) {
            if let Some(previous) = self.chat_log.latest().await? {
                return self.elaborate(question, previous).await;
            }
        }

        if question.is_empty() {
            return Err(AgentError::EmptyQuestion);
        }

        if !self.classifier.is_tax_related(question) {
            info!("Rejected non-tax question");
            return Err(AgentError::NotTaxRelated);
        }

        if let Some(cached) = self.chat_log.find_by_question(question).await? {
            info!("Cache hit for chat {}", cached.id);
            return Ok(cached.answer);
        }

        let answer = self.advisor.get_response(question, false, None).await.map_err(|e| {
            error!("Completion failed: {}", e);
            AgentError::from(e)
        })?;

        let record = self.chat_log.append(question, &answer).await?;
        info!("Stored chat {}", record.id);
        Ok(answer)
    }

    /// The stored question, not the follow-up text, is what gets elaborated on.
    async fn elaborate(&self, follow_up: &str, previous: ChatRecord) -> Result<String, AgentError> {
        info!("Follow-up detected, elaborating on chat {}", previous.id);
        let detailed = self.advisor
            .get_response(&previous.question, true, Some(&previous.answer)).await
            .map_err(|e| {
                error!("Detailed completion failed: {}", e);
                AgentError::from(e)
            })?;

        let record = self.chat_log.append(follow_up, &detailed).await?;
        info!("Stored follow-up chat {}", record.id);
        Ok(detailed)
    }

    /// Every stored chat, newest first.
    pub async fn chat_history(&self) -> Result<Vec<ChatRecord>, AgentError> {
        Ok(self.chat_log.all().await?)
    }
}
