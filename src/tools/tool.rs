use std::collections::HashMap;

/// A single-purpose callable exposed to the agent loop.
///
/// Each finance tool takes one JSON object holding a single string field
/// (base currency, country, or exchange name) and resolves to one JSON
/// string result. Lookup failures are folded into that string, so
/// implementations only return `Err` for parameters that do not match
/// their schema.
pub trait Tool: Send + Sync + std::fmt::Debug {
    /// Tool name as the model addresses it (e.g. `get_exchange_rates`)
    fn name(&self) -> &'static str;

    /// One-line description the model uses for tool selection
    fn description(&self) -> &'static str;

    /// JSON Schema for the tool's parameters
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with given parameters
    fn execute(
        &self,
        parameters: serde_json::Value,
    ) -> std::pin::Pin<
        Box<
            dyn std::future::Future<Output = Result<serde_json::Value, crate::AgentError>>
                + Send
                + '_,
        >,
    >;
}

/// Name-keyed set of the tools offered to the model
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// Render every registered tool as an OpenAI function definition
    pub fn to_openai_tools(&self) -> Vec<serde_json::Value> {
        self.tools
            .values()
            .map(|tool| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.parameters_schema()
                    }
                })
            })
            .collect()
    }
}
