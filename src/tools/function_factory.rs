use super::{tool::ToolRegistry, Tool};
use crate::{AgentError, Result};
use serde_json::Value;

/// Dispatch layer between the agent loop and the registered finance tools.
///
/// The loop hands over the tool name and arguments exactly as the model
/// produced them; an unknown name surfaces as `ToolNotFound`, which the
/// loop feeds back to the model as a recoverable error observation.
#[derive(Debug, Default)]
pub struct FunctionFactory {
    registry: ToolRegistry,
}

impl FunctionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with the factory
    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) {
        self.registry.register(tool);
    }

    /// Dispatch a model-issued function call to the matching tool
    pub async fn execute_function(&self, function_name: &str, parameters: Value) -> Result<Value> {
        let tool = self
            .registry
            .get(function_name)
            .ok_or_else(|| AgentError::ToolNotFound(function_name.to_string()))?;

        tool.execute(parameters).await
    }

    /// Function definitions for the chat-completions `tools` field
    pub fn get_openai_tools(&self) -> Vec<Value> {
        self.registry.to_openai_tools()
    }

    /// Check whether a tool is registered under this name
    pub fn has_function(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::finance_toolset;

    #[tokio::test]
    async fn test_unknown_function_is_tool_not_found() {
        let factory = finance_toolset();
        let err = factory
            .execute_function("get_weather", Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(_)));
        assert_eq!(err.error_code(), "TOOL_NOT_FOUND");
    }

    #[test]
    fn test_toolset_exposed_to_model() {
        let factory = finance_toolset();
        let mut names: Vec<String> = factory
            .get_openai_tools()
            .iter()
            .filter_map(|tool| tool["function"]["name"].as_str().map(String::from))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "get_exchange_rates",
                "get_hq_location_link",
                "get_stock_index_info"
            ]
        );
    }
}
