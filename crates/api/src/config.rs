/// Server configuration loaded from environment variables.
///
/// Network and timing fields have defaults suitable for local
/// development; upstream credentials must be provided. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Generous because
    /// a single ask request spans model generation plus query execution.
    pub request_timeout_secs: u64,
    /// How long a cached project context stays fresh, in seconds
    /// (default: `300`).
    pub context_ttl_secs: u64,
    /// Language-model API configuration.
    pub llm: LlmConfig,
    /// Query-engine API configuration.
    pub query: QueryConfig,
}

/// Connection settings for the language-model API.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the chat-completions API.
    pub api_url: String,
    /// Bearer token for the API.
    pub api_key: String,
    /// Model identifier sent with each request.
    pub model: String,
}

/// Connection settings for the SQL execution service.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Base URL of the execution service.
    pub api_url: String,
    /// Optional bearer token for the service.
    pub api_token: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    /// | `CONTEXT_TTL_SECS`     | `300`                      |
    /// | `LLM_API_URL`          | `https://api.openai.com`   |
    /// | `LLM_API_KEY`          | (required)                 |
    /// | `LLM_MODEL`            | `gpt-4o`                   |
    /// | `QUERY_API_URL`        | `http://localhost:8108`    |
    /// | `QUERY_API_TOKEN`      | (unset: no auth header)    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let context_ttl_secs: u64 = std::env::var("CONTEXT_TTL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("CONTEXT_TTL_SECS must be a valid u64");

        let llm = LlmConfig::from_env();
        let query = QueryConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            context_ttl_secs,
            llm,
            query,
        }
    }
}

impl LlmConfig {
    /// Load model API settings. `LLM_API_KEY` must be set.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("LLM_API_URL").unwrap_or_else(|_| "https://api.openai.com".into());

        let api_key =
            std::env::var("LLM_API_KEY").expect("LLM_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "LLM_API_KEY must not be empty");

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o".into());

        Self {
            api_url,
            api_key,
            model,
        }
    }
}

impl QueryConfig {
    /// Load execution-service settings.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("QUERY_API_URL").unwrap_or_else(|_| "http://localhost:8108".into());

        let api_token = std::env::var("QUERY_API_TOKEN").ok().filter(|t| !t.is_empty());

        Self { api_url, api_token }
    }
}
