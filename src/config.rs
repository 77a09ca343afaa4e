//! Configuration loaded from the environment at process start.
//!
//! - `OPENAI_API_KEY` - Required. API key for the model backend.
//! - `OPENAI_BASE_URL` / `OPENROUTER_BASE_URL` - Optional. Backend host.
//! - `FIN_AGENT_MODEL` - Optional. Model identifier.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_ITERATIONS` - Optional. Agent loop bound. Defaults to `10`.
//!
//! `EXCHANGERATE_API_KEY` is read by the exchange rate tool itself; a
//! missing key degrades to a text failure in the report, never a crash.

use crate::error::AgentError;

const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the OpenAI-compatible model backend
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Optional backend host override
    pub base_url: Option<String>,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AgentError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            AgentError::Config("Missing required environment variable: OPENAI_API_KEY".to_string())
        })?;

        let base_url = std::env::var("OPENAI_BASE_URL")
            .or_else(|_| std::env::var("OPENROUTER_BASE_URL"))
            .ok();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                AgentError::Config(format!("Invalid value for PORT: {}", raw))
            })?,
            Err(_) => 3000,
        };

        let max_iterations = match std::env::var("MAX_ITERATIONS") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| {
                AgentError::Config(format!("Invalid value for MAX_ITERATIONS: {}", raw))
            })?,
            Err(_) => 10,
        };

        Ok(Self {
            api_key,
            model: std::env::var("FIN_AGENT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url,
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            max_iterations,
        })
    }
}
