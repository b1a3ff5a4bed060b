use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::sync::Arc;
use log::info;

const DEFAULT_ANSWER_TEMPLATE: &str = r#"
You are an expert U.S. tax advisor. Please answer the following question:

Question: "{question}"

Provide a detailed response in paragraphs. If the response is longer than 50 words, split it into separate paragraphs after every 50 words.

Include the following details:
- A clear and concise explanation of the question.
- Relevant tax laws or IRS guidelines.
- Possible deductions or credits.
- Relevant forms or deadlines.

If the question is unclear or not tax-related, ask for clarification politely.
"#;

const DETAILED_ANSWER_TEMPLATE: &str = r#"
You provided the following response earlier:

Response: "{previous_answer}"

The user has now asked for more details or clarification. Please provide a more detailed, in-depth explanation:

Question: "{question}"

Include additional tax laws, examples, and relevant forms where applicable.
"#;

const CONTINUATION_TEMPLATE: &str = "Continue from: '{tail}'";

#[derive(Debug)]
pub enum PromptError {
    MissingPlaceholder { template: &'static str, placeholder: &'static str },
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::MissingPlaceholder { template, placeholder } =>
                write!(f, "Prompt template '{}' is missing placeholder '{}'", template, placeholder),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// Templates used to build completion prompts.
///
/// Placeholders: `{question}` and `{previous_answer}` in the answer templates,
/// `{tail}` in the continuation template. Fields missing from a JSON override
/// fall back to the built-in text.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PromptConfig {
    pub answer: String,
    pub detailed_answer: String,
    pub continuation: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            answer: DEFAULT_ANSWER_TEMPLATE.to_string(),
            detailed_answer: DETAILED_ANSWER_TEMPLATE.to_string(),
            continuation: CONTINUATION_TEMPLATE.to_string(),
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        let required: [(&'static str, &str, &'static str); 4] = [
            ("answer", &self.answer, "{question}"),
            ("detailed_answer", &self.detailed_answer, "{question}"),
            ("detailed_answer", &self.detailed_answer, "{previous_answer}"),
            ("continuation", &self.continuation, "{tail}"),
        ];
        for (template, text, placeholder) in required {
            if !text.contains(placeholder) {
                return Err(PromptError::MissingPlaceholder { template, placeholder });
            }
        }
        Ok(())
    }

    pub fn answer_prompt(&self, question: &str) -> String {
        render(&self.answer, &[("{question}", question)])
    }

    pub fn detailed_prompt(&self, question: &str, previous_answer: &str) -> String {
        render(&self.detailed_answer, &[
            ("{question}", question),
            ("{previous_answer}", previous_answer),
        ])
    }

    pub fn continuation_prompt(&self, tail: &str) -> String {
        render(&self.continuation, &[("{tail}", tail)])
    }
}

/// Fills placeholders in one left-to-right pass over the template, so text
/// substituted in is never scanned for placeholders again.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template.trim();
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match values.iter().find(|(placeholder, _)| candidate.starts_with(placeholder)) {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &candidate[placeholder.len()..];
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

pub fn load_prompts_from_str(json: &str) -> Result<PromptConfig, PromptError> {
    let config: PromptConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

pub fn load_prompts(path: &str) -> Result<Arc<PromptConfig>, Box<dyn Error + Send + Sync>> {
    let file_content = fs
        ::read_to_string(path)
        .map_err(|e| format!("Failed to read prompts file '{}': {}", path, e))?;
    let config = load_prompts_from_str(&file_content)
        .map_err(|e| format!("Failed to parse prompts file '{}': {}", path, e))?;
    info!("Loaded prompt templates from {}", path);
    Ok(Arc::new(config))
}
