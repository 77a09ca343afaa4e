//! Task construction and the default finance toolset.
//!
//! One user submission becomes one natural-language instruction handed to
//! the agent loop, which then drives the three market tools.

use crate::{
    core::agent::Agent,
    error::Result,
    tools::{ExchangeRateTool, FunctionFactory, HqLocationTool, StockIndexTool},
};

/// Build the per-submission task string for a country
pub fn build_report_task(country: &str) -> String {
    format!(
        "For {}: Give me official currency, exchange rates to USD/INR/GBP/EUR, major stock index value, and its HQ map link.",
        country
    )
}

/// Assemble the default toolset: exchange rates, stock index, HQ map link
pub fn finance_toolset() -> FunctionFactory {
    let mut factory = FunctionFactory::new();
    factory.register_tool(ExchangeRateTool::from_env());
    factory.register_tool(StockIndexTool::new());
    factory.register_tool(HqLocationTool::new());
    factory
}

/// Run one report generation for a country and return the markdown text
pub async fn generate_report(agent: &Agent, country: &str) -> Result<String> {
    agent.run(&build_report_task(country)).await
}
