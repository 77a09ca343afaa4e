use super::steps::AgentStep;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Ordered log of the agent's reasoning steps plus the system prompt,
/// convertible to OpenAI chat-message format for each model call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMemory {
    steps: Vec<AgentStep>,
    system_prompt: Option<String>,
}

impl AgentMemory {
    /// Create a new memory with optional system prompt
    pub fn new(system_prompt: Option<String>) -> Self {
        Self {
            steps: Vec::new(),
            system_prompt,
        }
    }

    /// Create memory with the default market-analyst system prompt
    pub fn with_default_system() -> Self {
        Self::new(Some(
            "You are a global finance intelligence agent with access to market data tools. Use the tools to gather exchange rates, stock index values, and headquarters map links before answering. Be concise and factual. When you are ready to give the final report, you MUST call the `final_answer` tool with an `answer` string containing the markdown report instead of replying directly.".to_string()
        ))
    }

    /// Add a step to memory
    pub fn add_step(&mut self, step: AgentStep) {
        let description = step.describe();
        info!(target: "fin_agent::steps", "{}", description);
        self.steps.push(step);
    }

    /// Get all steps
    pub fn steps(&self) -> &[AgentStep] {
        &self.steps
    }

    /// Convert memory to OpenAI message format
    pub fn as_messages(&self) -> Vec<Value> {
        let mut messages = Vec::new();

        if let Some(system_prompt) = &self.system_prompt {
            messages.push(serde_json::json!({
                "role": "system",
                "content": system_prompt
            }));
        }

        for step in &self.steps {
            messages.push(step.to_message());
        }

        messages
    }

    /// Get number of steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Check if memory is empty (excluding system prompt)
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Count tool-call steps
    pub fn count_actions(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AgentStep::Action { .. }))
            .count()
    }

    /// Count tool-result steps
    pub fn count_observations(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AgentStep::Observation { .. }))
            .count()
    }
}

impl Default for AgentMemory {
    fn default() -> Self {
        Self::with_default_system()
    }
}
