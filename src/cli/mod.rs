use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat History Args ---
    /// Chat history store type (sqlite, memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "sqlite")]
    pub history_type: String,

    /// SQLite connection URL for the chat history store
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://chat_history.db?mode=rwc")]
    pub database_url: String,

    // --- Chat LLM Provider Args ---
    /// API Key for the chat completion provider. Requests fail with a credential error when empty.
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gpt-4, gpt-4o)
    #[arg(long, env = "CHAT_MODEL", default_value = "gpt-4")]
    pub chat_model: String,

    /// Base URL for the chat completion API. `/v1/chat/completions` is appended.
    #[arg(long, env = "CHAT_BASE_URL", default_value = "https://api.openai.com")]
    pub chat_base_url: String,

    /// Token budget for the primary answer.
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "2000")]
    pub max_tokens: u32,

    /// Token budget for the continuation of a truncated answer.
    #[arg(long, env = "CHAT_CONTINUATION_MAX_TOKENS", default_value = "1000")]
    pub continuation_max_tokens: u32,

    /// Sampling temperature sent with every completion request.
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.5")]
    pub temperature: f32,

    // --- Upstream Retry Args ---
    /// Per-attempt timeout for completion requests, in seconds.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,

    /// Maximum number of attempts when the upstream answers 502, 503 or 504.
    #[arg(long, env = "CHAT_MAX_RETRIES", default_value = "5")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds. Doubles after every failed attempt.
    #[arg(long, env = "CHAT_BACKOFF_BASE_MS", default_value = "1000")]
    pub backoff_base_ms: u64,

    // --- General App Args ---
    /// Number of words per paragraph in formatted answers.
    #[arg(long, env = "WORDS_PER_PARAGRAPH", default_value = "50")]
    pub words_per_paragraph: usize,

    /// Optional path to a JSON file overriding the built-in prompt templates.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:5000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    /// Serve HTTPS using --tls-cert-path and --tls-key-path
    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
