use super::Tool;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Closed table of supported countries and their primary index tickers
const INDEX_TICKERS: [(&str, &str); 6] = [
    ("Japan", "^N225"),
    ("India", "^BSESN"),
    ("US", "^GSPC"),
    ("South Korea", "^KS11"),
    ("China", "000001.SS"),
    ("UK", "^FTSE"),
];

/// Parameters accepted by the stock index tool
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct StockIndexParams {
    /// Country name, matched exactly (e.g. Japan)
    pub country: String,
}

/// Tool that reports the latest value of a country's primary stock index
///
/// Countries outside the fixed table are answered without touching the
/// network. Quote-source failures become descriptive sentences, never
/// errors propagated past the tool boundary.
#[derive(Debug, Clone)]
pub struct StockIndexTool {
    base_url: String,
    client: Client,
}

impl Default for StockIndexTool {
    fn default() -> Self {
        Self::new()
    }
}

impl StockIndexTool {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Override the quote-source host (used in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_index_value(&self, country: &str, ticker: &str) -> String {
        // Index tickers carry a leading caret, which is not path-safe
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            ticker.replace('^', "%5E")
        );

        let response = match self.client.get(&url).timeout(HTTP_TIMEOUT).send().await {
            Ok(response) => response,
            Err(err) => return format!("Stock data error: {}", err),
        };

        if let Err(err) = response.error_for_status_ref() {
            return format!("Stock data error: {}", err);
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(err) => return format!("Stock data error: {}", err),
        };

        match extract_last_price(&data) {
            Some(value) => format!(
                "The major index for {} ({}) is currently at {:.2}.",
                country, ticker, value
            ),
            None => format!(
                "Data for {} is currently unavailable from Yahoo Finance.",
                ticker
            ),
        }
    }
}

/// Look up the index ticker for a country in the closed table
pub fn index_ticker(country: &str) -> Option<&'static str> {
    INDEX_TICKERS
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, ticker)| *ticker)
}

fn extract_last_price(data: &Value) -> Option<f64> {
    data.get("chart")?
        .get("result")?
        .get(0)?
        .get("meta")?
        .get("regularMarketPrice")?
        .as_f64()
}

impl Tool for StockIndexTool {
    fn name(&self) -> &'static str {
        "get_stock_index_info"
    }

    fn description(&self) -> &'static str {
        "Returns the primary stock index ticker and its current value for a country"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "country": {
                    "type": "string",
                    "description": "Country name, e.g. Japan"
                }
            },
            "required": ["country"]
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
            let params: StockIndexParams = serde_json::from_value(parameters).map_err(|err| {
                crate::AgentError::ToolExecution(format!("Invalid parameters: {}", err))
            })?;

            let report = match index_ticker(&params.country) {
                Some(ticker) => self.fetch_index_value(&params.country, ticker).await,
                None => format!(
                    "Could not find an index ticker for {}.",
                    params.country
                ),
            };

            Ok(Value::String(report))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_ticker_table() {
        assert_eq!(index_ticker("Japan"), Some("^N225"));
        assert_eq!(index_ticker("India"), Some("^BSESN"));
        assert_eq!(index_ticker("US"), Some("^GSPC"));
        assert_eq!(index_ticker("South Korea"), Some("^KS11"));
        assert_eq!(index_ticker("China"), Some("000001.SS"));
        assert_eq!(index_ticker("UK"), Some("^FTSE"));
        assert_eq!(index_ticker("France"), None);
        // Exact match only
        assert_eq!(index_ticker("japan"), None);
    }

    #[test]
    fn test_extract_last_price() {
        let data = json!({
            "chart": {
                "result": [
                    { "meta": { "regularMarketPrice": 38451.2345 } }
                ]
            }
        });
        assert_eq!(extract_last_price(&data), Some(38451.2345));

        let empty = json!({ "chart": { "result": [ { "meta": {} } ] } });
        assert_eq!(extract_last_price(&empty), None);
    }
}
