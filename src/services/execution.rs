use crate::{
    core::{
        agent::Agent,
        memory::AgentMemory,
        steps::AgentStep,
        tool_call::{ToolCall, ToolExecution},
    },
    error::{AgentError, Result},
    services::llm_client::ChatCompletionRequest,
    types::result::{RunResult, TokenUsage},
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;
use tokio::time::timeout;
use tracing::debug;

pub(crate) const FINAL_ANSWER_TOOL: &str = "final_answer";

#[derive(Debug, Deserialize)]
struct FinalAnswerArguments {
    answer: String,
}

/// Definition of the pseudo-tool the model must call to finish a run
pub(crate) fn final_answer_tool_definition() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": FINAL_ANSWER_TOOL,
            "description": "Provide the final markdown report once all required data has been gathered",
            "parameters": {
                "type": "object",
                "properties": {
                    "answer": {
                        "type": "string",
                        "description": "The complete final report"
                    }
                },
                "required": ["answer"]
            }
        }
    })
}

impl Agent {
    /// Run the agent loop and return the full trace alongside the report.
    ///
    /// Each iteration sends the accumulated steps to the model; tool calls
    /// in the reply are executed sequentially and their textual results fed
    /// back as observations. Malformed calls, unknown tools, and tool
    /// failures all become error observations the model can recover from.
    /// The loop terminates on `final_answer` or after `max_iterations`.
    pub async fn run_with_steps(&self, task: &str) -> Result<RunResult> {
        let start_time = Instant::now();
        let mut memory = AgentMemory::with_default_system();

        memory.add_step(AgentStep::Task {
            content: task.to_string(),
        });

        let mut iteration = 0;
        let mut last_usage: Option<TokenUsage> = None;

        while iteration < self.max_iterations() {
            iteration += 1;

            let mut tools = self.function_factory().get_openai_tools();
            tools.push(final_answer_tool_definition());

            let request_body =
                ChatCompletionRequest::new(self.model().to_owned(), memory.as_messages())
                    .with_tools(tools)
                    .with_tool_choice(json!("auto"))
                    .with_max_tokens(self.max_tokens())
                    .into_value();

            let response = timeout(self.timeout(), self.make_raw_request(&request_body))
                .await
                .map_err(|_| AgentError::Timeout("Chat completion call timed out".to_string()))??;

            let assistant_message = extract_assistant_message(&response)?;
            if let Some(usage) = extract_token_usage(&response) {
                last_usage = Some(usage);
            }

            let tool_calls = assistant_message
                .get("tool_calls")
                .and_then(Value::as_array)
                .filter(|calls| !calls.is_empty());

            let Some(tool_calls) = tool_calls else {
                // Prose reply instead of a tool call; steer the model back
                let answer = assistant_message
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .trim();

                let reminder = if answer.is_empty() {
                    "Assistant must call the `final_answer` tool to conclude the task, but returned no content.".to_string()
                } else {
                    format!(
                        "Assistant must call the `final_answer` tool to conclude the task. Received plain response: {}",
                        answer
                    )
                };

                memory.add_step(AgentStep::Observation {
                    tool_call_id: FINAL_ANSWER_TOOL.to_string(),
                    result: reminder,
                    is_error: true,
                });
                continue;
            };

            for raw_call in tool_calls {
                let Some(call) = ToolCall::from_openai_format(raw_call) else {
                    let tool_call_id = raw_call
                        .get("id")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    memory.add_step(AgentStep::Observation {
                        tool_call_id: tool_call_id.to_string(),
                        result: AgentError::InvalidFunctionCall(format!(
                            "Malformed tool call: {}",
                            raw_call
                        ))
                        .to_error_payload()
                        .to_string(),
                        is_error: true,
                    });
                    continue;
                };

                debug!(target: "fin_agent::loop", "executing {}", call.describe());

                if call.name == FINAL_ANSWER_TOOL {
                    match serde_json::from_value::<FinalAnswerArguments>(call.arguments.clone()) {
                        Ok(args) if !args.answer.trim().is_empty() => {
                            let answer = args.answer.trim().to_string();
                            memory.add_step(AgentStep::FinalAnswer {
                                answer: answer.clone(),
                            });
                            return Ok(RunResult::new(
                                answer,
                                memory.steps().to_vec(),
                                last_usage,
                                start_time.elapsed(),
                                iteration,
                            ));
                        }
                        Ok(_) => {
                            memory.add_step(AgentStep::Observation {
                                tool_call_id: call.id,
                                result: AgentError::InvalidFunctionCall(
                                    "final_answer requires a non-empty `answer` field".to_string(),
                                )
                                .to_error_payload()
                                .to_string(),
                                is_error: true,
                            });
                        }
                        Err(err) => {
                            memory.add_step(AgentStep::Observation {
                                tool_call_id: call.id,
                                result: AgentError::InvalidFunctionCall(format!(
                                    "Invalid final_answer arguments: {}",
                                    err
                                ))
                                .to_error_payload()
                                .to_string(),
                                is_error: true,
                            });
                        }
                    }
                    continue;
                }

                memory.add_step(AgentStep::Action {
                    tool_name: call.name.clone(),
                    tool_call_id: call.id.clone(),
                    arguments: call.arguments.clone(),
                });

                let arguments = call.arguments.clone();
                let tool_name = call.name.clone();
                let execution = ToolExecution::start(call);
                let output = match self
                    .function_factory()
                    .execute_function(&tool_name, arguments)
                    .await
                {
                    Ok(result) => execution.complete(result, false),
                    Err(err) => execution.complete(err.to_error_payload(), true),
                };

                memory.add_step(AgentStep::Observation {
                    tool_call_id: output.tool_call_id.clone(),
                    result: output.as_string(),
                    is_error: output.is_error,
                });
            }
        }

        Err(AgentError::MaxIterations(self.max_iterations()))
    }
}

fn extract_assistant_message(response: &Value) -> Result<Value> {
    let choices = response
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AgentError::Unknown("Missing 'choices' array in completion response".to_string())
        })?;

    let first_choice = choices.first().ok_or_else(|| {
        AgentError::Unknown("Completion response contained no choices".to_string())
    })?;

    first_choice.get("message").cloned().ok_or_else(|| {
        AgentError::Unknown("Completion response missing assistant message".to_string())
    })
}

fn extract_token_usage(response: &Value) -> Option<TokenUsage> {
    let usage = response.get("usage")?;
    Some(TokenUsage {
        prompt_tokens: usage.get("prompt_tokens")?.as_u64()? as u32,
        completion_tokens: usage.get("completion_tokens")?.as_u64()? as u32,
        total_tokens: usage.get("total_tokens")?.as_u64()? as u32,
    })
}
