use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Represents a tool call request from the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool to execute
    pub name: String,
    /// Arguments to pass to the tool
    pub arguments: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: String, name: String, arguments: Value) -> Self {
        Self {
            id,
            name,
            arguments,
        }
    }

    /// Parse a tool call from OpenAI response format.
    ///
    /// Returns `None` when the call is structurally malformed: missing id,
    /// missing function name, or arguments that are not valid JSON. The run
    /// loop turns that into an error observation the model can recover from.
    pub fn from_openai_format(tool_call: &Value) -> Option<Self> {
        let id = tool_call.get("id")?.as_str()?.to_string();
        let function = tool_call.get("function")?;
        let name = function.get("name")?.as_str()?.to_string();
        if name.is_empty() {
            return None;
        }

        let arguments_str = function.get("arguments")?.as_str()?;
        let arguments: Value = serde_json::from_str(arguments_str).ok()?;

        Some(Self {
            id,
            name,
            arguments,
        })
    }

    /// Get a human-readable description
    pub fn describe(&self) -> String {
        format!("{}({})", self.name, self.arguments)
    }
}

/// Represents the output from a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The tool call ID this output corresponds to
    pub tool_call_id: String,
    /// The tool name that was executed
    pub tool_name: String,
    /// The output/result from the tool
    pub output: Value,
    /// Whether the execution resulted in an error
    pub is_error: bool,
    /// Execution duration in milliseconds
    pub duration_ms: Option<u128>,
}

impl ToolOutput {
    /// Get the output as a string for message content
    pub fn as_string(&self) -> String {
        match &self.output {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Tracks the execution of a tool call with timing information
#[derive(Debug)]
pub struct ToolExecution {
    pub tool_call: ToolCall,
    start_time: Instant,
}

impl ToolExecution {
    /// Start tracking a tool execution
    pub fn start(tool_call: ToolCall) -> Self {
        Self {
            tool_call,
            start_time: Instant::now(),
        }
    }

    /// Complete the execution and get the output with timing
    pub fn complete(self, output: Value, is_error: bool) -> ToolOutput {
        let duration = self.start_time.elapsed();
        ToolOutput {
            tool_call_id: self.tool_call.id,
            tool_name: self.tool_call.name,
            output,
            is_error,
            duration_ms: Some(duration.as_millis()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_creation() {
        let call = ToolCall::new(
            "call_123".to_string(),
            "get_exchange_rates".to_string(),
            serde_json::json!({"base_currency": "JPY"}),
        );
        assert_eq!(call.id, "call_123");
        assert_eq!(call.name, "get_exchange_rates");
    }

    #[test]
    fn test_tool_call_from_openai() {
        let openai_format = serde_json::json!({
            "id": "call_456",
            "type": "function",
            "function": {
                "name": "get_stock_index_info",
                "arguments": "{\"country\": \"Japan\"}"
            }
        });

        let call = ToolCall::from_openai_format(&openai_format).unwrap();
        assert_eq!(call.id, "call_456");
        assert_eq!(call.name, "get_stock_index_info");
        assert_eq!(call.arguments["country"], "Japan");
    }

    #[test]
    fn test_tool_call_malformed_arguments() {
        let openai_format = serde_json::json!({
            "id": "call_789",
            "type": "function",
            "function": {
                "name": "get_stock_index_info",
                "arguments": "{not json"
            }
        });

        assert!(ToolCall::from_openai_format(&openai_format).is_none());
    }

    #[test]
    fn test_tool_call_missing_name() {
        let openai_format = serde_json::json!({
            "id": "call_000",
            "type": "function",
            "function": { "arguments": "{}" }
        });

        assert!(ToolCall::from_openai_format(&openai_format).is_none());
    }

    #[test]
    fn test_tool_execution_timing() {
        let call = ToolCall::new("call_123".to_string(), "test".to_string(), Value::Null);
        let execution = ToolExecution::start(call);
        let output = execution.complete(serde_json::json!("result"), false);
        assert!(output.duration_ms.is_some());
        assert!(!output.is_error);
        assert_eq!(output.as_string(), "result");
    }
}
