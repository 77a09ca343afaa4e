use super::Tool;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::pin::Pin;

/// Parameters accepted by the HQ location tool
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HqLocationParams {
    /// Name of the stock exchange (e.g. Tokyo Stock Exchange)
    pub exchange_name: String,
}

/// Tool that builds a Google Maps search link for an exchange's headquarters
///
/// Pure string transformation: no network call, no failure mode.
#[derive(Debug, Default)]
pub struct HqLocationTool;

impl HqLocationTool {
    pub fn new() -> Self {
        Self
    }
}

/// Spaces become `+`, the query lands in a fixed map-search template
pub fn hq_location_link(exchange_name: &str) -> String {
    let formatted_query = exchange_name.replace(' ', "+");
    format!(
        "Google Maps HQ Link: https://www.google.com/maps/search/?api=1&query={}+headquarters",
        formatted_query
    )
}

impl Tool for HqLocationTool {
    fn name(&self) -> &'static str {
        "get_hq_location_link"
    }

    fn description(&self) -> &'static str {
        "Provides a Google Maps search link for a stock exchange's headquarters"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "exchange_name": {
                    "type": "string",
                    "description": "Name of the stock exchange"
                }
            },
            "required": ["exchange_name"]
        })
    }

    fn execute(
        &self,
        parameters: serde_json::Value,
    ) -> Pin<
        Box<
            dyn std::future::Future<Output = Result<serde_json::Value, crate::AgentError>>
                + Send
                + '_,
        >,
    > {
        Box::pin(async move {
            let params: HqLocationParams = serde_json::from_value(parameters).map_err(|err| {
                crate::AgentError::ToolExecution(format!("Invalid parameters: {}", err))
            })?;

            Ok(Value::String(hq_location_link(&params.exchange_name)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hq_location_link() {
        let link = hq_location_link("Tokyo Stock Exchange");
        assert_eq!(
            link,
            "Google Maps HQ Link: https://www.google.com/maps/search/?api=1&query=Tokyo+Stock+Exchange+headquarters"
        );
    }

    #[test]
    fn test_hq_location_link_deterministic() {
        let first = hq_location_link("London Stock Exchange");
        let second = hq_location_link("London Stock Exchange");
        assert_eq!(first, second);
        assert!(first.ends_with("query=London+Stock+Exchange+headquarters"));
    }

    #[test]
    fn test_hq_location_link_no_spaces() {
        let link = hq_location_link("Euronext");
        assert!(link.contains("query=Euronext+headquarters"));
    }
}
