use super::Tool;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Target currencies reported in every lookup, in fixed order
const TARGET_CURRENCIES: [&str; 4] = ["USD", "INR", "GBP", "EUR"];

/// Parameters accepted by the exchange rate tool
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExchangeRateParams {
    /// Base currency code (e.g. JPY)
    pub base_currency: String,
}

/// Tool that fetches live conversion rates for a base currency
///
/// Every failure (transport, HTTP status, upstream error payload) is
/// converted into a descriptive sentence and returned as a normal result,
/// so the agent loop always receives text it can reason about.
#[derive(Debug, Clone)]
pub struct ExchangeRateTool {
    api_key: String,
    base_url: String,
    client: Client,
}

impl ExchangeRateTool {
    /// Create a new tool using the provided API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Build the tool from the `EXCHANGERATE_API_KEY` environment variable.
    ///
    /// A missing variable yields an empty key embedded in the request URL,
    /// which the upstream rejects and the tool reports as a text failure.
    pub fn from_env() -> Self {
        Self::new(std::env::var("EXCHANGERATE_API_KEY").unwrap_or_default())
    }

    /// Override the upstream host (used in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_rates(&self, base_currency: &str) -> String {
        let url = format!(
            "{}/v6/{}/latest/{}",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            base_currency
        );

        let response = match self.client.get(&url).timeout(HTTP_TIMEOUT).send().await {
            Ok(response) => response,
            Err(err) => return format!("Failed to fetch rates: {}", err),
        };

        if let Err(err) = response.error_for_status_ref() {
            return format!("Failed to fetch rates: {}", err);
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(err) => return format!("Failed to fetch rates: {}", err),
        };

        format_rates(base_currency, &data)
    }
}

impl Tool for ExchangeRateTool {
    fn name(&self) -> &'static str {
        "get_exchange_rates"
    }

    fn description(&self) -> &'static str {
        "Fetches exchange rates from a base currency (like JPY) to USD, INR, GBP, and EUR"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "base_currency": {
                    "type": "string",
                    "description": "Base currency code, e.g. JPY"
                }
            },
            "required": ["base_currency"]
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
            let params: ExchangeRateParams = serde_json::from_value(parameters).map_err(|err| {
                crate::AgentError::ToolExecution(format!("Invalid parameters: {}", err))
            })?;

            let report = self.fetch_rates(&params.base_currency).await;
            Ok(Value::String(report))
        })
    }
}

/// Reduce the upstream payload to a sentence covering exactly the four
/// target currencies, `None` standing in for any rate the source omits.
fn format_rates(base_currency: &str, data: &Value) -> String {
    if data.get("result").and_then(Value::as_str) != Some("success") {
        let error_type = data
            .get("error-type")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        return format!("API Error: {}", error_type);
    }

    let rates = data.get("conversion_rates");
    let listed: Vec<String> = TARGET_CURRENCIES
        .iter()
        .map(|code| {
            match rates.and_then(|r| r.get(*code)).and_then(Value::as_f64) {
                Some(rate) => format!("{}: {}", code, rate),
                None => format!("{}: None", code),
            }
        })
        .collect();

    format!(
        "1 {} is currently worth: {}",
        base_currency,
        listed.join(", ")
    )
}
