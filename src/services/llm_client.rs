use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::{AgentError, Result};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
// 5 retries = 6 attempts total against the model backend
const MAX_RETRIES: usize = 5;
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Client for OpenAI-compatible chat-completions backends with bounded,
/// jittered exponential retry on rate limits and server errors
#[derive(Clone, Debug)]
pub struct LlmClient {
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub async fn chat_completion(&self, body: &Value, timeout: Duration) -> Result<Value> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AgentError::Unknown(format!("Failed to build HTTP client: {err}")))?;

        let mut attempt = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let request_url = build_chat_url(&self.base_url);

            let response = client
                .post(&request_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .header("X-Title", "fin-agent-rs")
                .json(body)
                .send()
                .await
                .map_err(|err| AgentError::Unknown(format!("HTTP request failed: {err}")))?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response
                .text()
                .await
                .map_err(|err| AgentError::Unknown(format!("Failed to read response: {err}")))?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_duration = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| jittered(backoff));

                if attempt < MAX_RETRIES {
                    warn!(
                        target: "fin_agent::llm",
                        "rate limited, retrying in {:?} (attempt {})",
                        retry_after_duration,
                        attempt + 1
                    );
                    tokio::time::sleep(retry_after_duration).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(AgentError::RateLimit {
                    retry_after: retry_after_duration.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < MAX_RETRIES {
                let delay = jittered(backoff);
                warn!(
                    target: "fin_agent::llm",
                    "backend returned {}, retrying in {:?} (attempt {})",
                    status,
                    delay,
                    attempt + 1
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                // Error bodies are not always JSON; keep the status and fall
                // back to the raw text when no structured message is present
                let api_message = serde_json::from_str::<Value>(&response_text)
                    .ok()
                    .as_ref()
                    .and_then(|json| json.get("error"))
                    .and_then(|error| error.get("message"))
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| response_text.clone());

                return Err(AgentError::Unknown(format!(
                    "HTTP {} error: {}",
                    status, api_message
                )));
            }

            let response_json: Value = serde_json::from_str(&response_text)
                .map_err(|err| AgentError::Unknown(format!("Failed to parse JSON: {err}")))?;

            if let Some(error) = response_json.get("error") {
                let error_message = error
                    .get("message")
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| error.to_string());
                return Err(AgentError::Unknown(format!("API error: {}", error_message)));
            }

            return Ok(response_json);
        }
    }
}

/// Add uniform jitter of up to half the base delay
fn jittered(backoff: Duration) -> Duration {
    let base = backoff.as_millis() as u64;
    let jitter = rand::rng().random_range(0..=base / 2);
    Duration::from_millis(base + jitter)
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    tools: Vec<Value>,
    tool_choice: Option<Value>,
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            tool_choice: None,
            max_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: Value) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if !self.tools.is_empty() {
            body["tools"] = Value::Array(self.tools);
        }

        if let Some(tool_choice) = self.tool_choice {
            body["tool_choice"] = tool_choice;
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chat_url() {
        assert_eq!(
            build_chat_url("https://openrouter.ai/api/v1"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("https://openrouter.ai/api/v1/"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("http://localhost:8080/v1/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_jittered_bounds() {
        for _ in 0..32 {
            let delay = jittered(Duration::from_millis(400));
            assert!(delay >= Duration::from_millis(400));
            assert!(delay <= Duration::from_millis(600));
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_keeps_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(404)
            .with_body("model not found")
            .create_async()
            .await;

        let mut client = LlmClient::new("key".to_string());
        client.set_base_url(server.url());

        let err = client
            .chat_completion(&json!({"model": "x"}), Duration::from_secs(5))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("HTTP 404"), "got: {}", message);
        assert!(message.contains("model not found"), "got: {}", message);
        assert!(!message.contains("Failed to parse JSON"), "got: {}", message);
    }

    #[tokio::test]
    async fn test_json_error_body_message_extracted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body(json!({"error": {"message": "bad request body"}}).to_string())
            .create_async()
            .await;

        let mut client = LlmClient::new("key".to_string());
        client.set_base_url(server.url());

        let err = client
            .chat_completion(&json!({"model": "x"}), Duration::from_secs(5))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("HTTP 400"), "got: {}", message);
        assert!(message.contains("bad request body"), "got: {}", message);
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatCompletionRequest::new(
            "google/gemini-2.5-flash-lite",
            vec![json!({"role": "user", "content": "hi"})],
        )
        .with_tools(vec![json!({"type": "function"})])
        .with_tool_choice(json!("auto"))
        .with_max_tokens(Some(500))
        .into_value();

        assert_eq!(body["model"], "google/gemini-2.5-flash-lite");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["tool_choice"], "auto");
        assert!(body["tools"].is_array());
    }
}
