use crate::core::steps::AgentStep;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token usage reported by the model backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Result of a full agent run: the final report plus the step trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Final report text produced via the `final_answer` tool
    pub output: String,
    /// Ordered reasoning trace (task, actions, observations, final answer)
    pub steps: Vec<AgentStep>,
    /// Token usage from the last model call, when reported
    pub token_usage: Option<TokenUsage>,
    /// Wall-clock duration of the run
    pub duration: Duration,
    /// Number of reasoning iterations consumed
    pub iterations: usize,
}

impl RunResult {
    pub fn new(
        output: String,
        steps: Vec<AgentStep>,
        token_usage: Option<TokenUsage>,
        duration: Duration,
        iterations: usize,
    ) -> Self {
        Self {
            output,
            steps,
            token_usage,
            duration,
            iterations,
        }
    }

    /// A run is successful when it ended with a final answer
    pub fn is_success(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step, AgentStep::FinalAnswer { .. }))
    }

    /// Count tool-call steps in the trace
    pub fn action_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, AgentStep::Action { .. }))
            .count()
    }

    /// Count tool-result steps in the trace
    pub fn observation_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, AgentStep::Observation { .. }))
            .count()
    }

    /// Names of the tools invoked, in call order
    pub fn invoked_tools(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                AgentStep::Action { tool_name, .. } => Some(tool_name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Render a human-readable execution trace
    pub fn replay(&self) -> String {
        let mut lines = vec![
            "=== Agent Execution Trace ===".to_string(),
            format!("Duration: {:?}", self.duration),
            format!("Iterations: {}", self.iterations),
            String::new(),
        ];

        for (index, step) in self.steps.iter().enumerate() {
            lines.push(format!("{}. {}", index + 1, step.describe()));
        }

        lines.push(String::new());
        lines.push(format!("Final Output: {}", self.output));
        lines.join("\n")
    }
}
