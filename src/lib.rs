//! fin-agent-rs: a global finance intelligence agent built on LLM tool calling
//!
//! A country name goes in, the agent drives three market-data tools
//! (currency exchange rates, the country's primary stock index, a map link
//! for the exchange's headquarters), and a markdown report comes out. Tool
//! failures are returned as descriptive text the model can reason about,
//! never as exceptions crossing the tool boundary.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fin_agent_rs::{report, Agent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent = Agent::from_env(report::finance_toolset())?;
//!     let answer = report::generate_report(&agent, "Japan").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub(crate) mod services;
pub mod tools;
pub mod types;

pub use config::Config;
pub use core::{Agent, AgentMemory, AgentStep, RunResult, TokenUsage, ToolCall, ToolOutput};
pub use error::{AgentError, Result};
pub use report::{build_report_task, finance_toolset, generate_report};
pub use tools::{ExchangeRateTool, FunctionFactory, HqLocationTool, StockIndexTool, Tool};

#[cfg(feature = "web")]
pub mod web;
