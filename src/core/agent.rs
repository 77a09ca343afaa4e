use crate::{
    error::{AgentError, Result},
    services::llm_client::LlmClient,
    tools::FunctionFactory,
};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";

/// Main agent: owns the model client, the registered toolset, and the
/// operational bounds of the reasoning loop
#[derive(Debug)]
pub struct Agent {
    llm_client: LlmClient,
    function_factory: FunctionFactory,
    model: String,
    max_iterations: usize,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl Agent {
    pub fn new(api_key: String, function_factory: FunctionFactory) -> Self {
        Self {
            llm_client: LlmClient::new(api_key),
            function_factory,
            model: DEFAULT_MODEL.to_string(),
            max_iterations: 10,
            max_tokens: Some(1000),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.llm_client.set_base_url(base_url);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(crate) fn function_factory(&self) -> &FunctionFactory {
        &self.function_factory
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the agent on a task and return the final report text
    pub async fn run(&self, task: &str) -> Result<String> {
        self.run_with_steps(task).await.map(|result| result.output)
    }

    pub(crate) async fn make_raw_request(&self, request_body: &Value) -> Result<Value> {
        self.llm_client
            .chat_completion(request_body, self.timeout)
            .await
    }

    /// Build an agent from the environment: `OPENAI_API_KEY` is required,
    /// `OPENAI_BASE_URL` / `OPENROUTER_BASE_URL` override the backend host
    pub fn from_env(function_factory: FunctionFactory) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            AgentError::Config(
                "OPENAI_API_KEY environment variable must be set before creating an Agent"
                    .to_string(),
            )
        })?;
        let mut agent = Self::new(api_key, function_factory);
        if let Ok(base_url) =
            std::env::var("OPENAI_BASE_URL").or_else(|_| std::env::var("OPENROUTER_BASE_URL"))
        {
            agent.llm_client.set_base_url(base_url);
        }
        Ok(agent)
    }
}
